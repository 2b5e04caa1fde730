fn main() {
    // Release builds set PROCRASTINATOR_VERSION; otherwise derive it from git.
    if let Ok(version) = std::env::var("PROCRASTINATOR_VERSION") {
        println!("cargo:rustc-env=PROCRASTINATOR_VERSION={version}");
    } else {
        let hash = std::process::Command::new("git")
            .args(["rev-parse", "--short=7", "HEAD"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .unwrap_or_default()
            .trim()
            .to_string();

        let version = if hash.is_empty() {
            env!("CARGO_PKG_VERSION").to_string()
        } else {
            format!("{}-{hash}", env!("CARGO_PKG_VERSION"))
        };
        println!("cargo:rustc-env=PROCRASTINATOR_VERSION={version}");
    }
    println!("cargo:rerun-if-env-changed=PROCRASTINATOR_VERSION");
}
