pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod store;
pub mod tui;

/// Build version, including the git hash for development builds.
pub const VERSION: &str = env!("PROCRASTINATOR_VERSION");
