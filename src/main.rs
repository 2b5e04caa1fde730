use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use procrastinator::api::HttpApi;
use procrastinator::store;
use procrastinator::{VERSION, cli, config, logging, tui};

#[derive(Parser)]
#[command(
    name = "procrastinator",
    version = VERSION,
    about = "Beat procrastination: tasks, projects and a kanban board in your terminal"
)]
struct Cli {
    /// Backend base URL (overrides config file and PROCRASTINATOR_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the TUI dashboard (default)
    Dashboard,
    /// List tasks, optionally only those of one project
    ListTasks {
        /// Project name
        #[arg(long)]
        project: Option<String>,
    },
    /// List projects with their task counts
    ListProjects,
    /// Show overall statistics
    Stats,
    /// Check that the backend is reachable
    Health,
    /// Create a task
    AddTask {
        /// Task title
        title: String,
        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Priority: low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Due date (YYYY-MM-DD HH:MM)
        #[arg(long)]
        due: Option<String>,
        /// Project name to file the task under
        #[arg(long)]
        project: Option<String>,
    },
    /// Change a task's status
    SetStatus {
        /// Task id
        id: String,
        /// New status: todo, in_progress or completed
        status: String,
    },
    /// Delete a task
    DeleteTask {
        /// Task id
        id: String,
    },
    /// Create a project
    AddProject {
        /// Project name
        name: String,
        /// Project description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Colour as #rrggbb
        #[arg(short, long, default_value = store::DEFAULT_PROJECT_COLOR)]
        color: String,
    },
    /// Delete a project and all of its tasks
    RemoveProject {
        /// Project name
        name: String,
    },
    /// Ask for a motivational quote about a task
    Quote {
        /// Task title
        title: String,
        /// Priority: low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    config::ensure_dirs()?;
    let mut cfg = config::load()?;
    cfg.apply_cli(args.api_url.as_deref());
    logging::init(&config::log_path()?, &cfg.log_level)?;

    let api = HttpApi::new(&cfg.api_url, cfg.request_timeout())
        .with_context(|| format!("invalid api_url '{}'", cfg.api_url))?;
    tracing::info!(api_url = %cfg.api_url, version = VERSION, "starting");

    let mut out = std::io::stdout();
    match args.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => tui::run(store::Store::new(api), &cfg),
        Commands::ListTasks { project } => cli::list_tasks(&api, project.as_deref(), &mut out),
        Commands::ListProjects => cli::list_projects(&api, &mut out),
        Commands::Stats => cli::stats(&api, &mut out),
        Commands::Health => cli::health(&api, api.base_url(), &mut out),
        Commands::AddTask {
            title,
            description,
            priority,
            due,
            project,
        } => cli::add_task(
            &api,
            &title,
            &description,
            &priority,
            due.as_deref(),
            project.as_deref(),
            &mut out,
        ),
        Commands::SetStatus { id, status } => cli::set_status(&api, &id, &status, &mut out),
        Commands::DeleteTask { id } => cli::delete_task(&api, &id, &mut out),
        Commands::AddProject {
            name,
            description,
            color,
        } => cli::add_project(&api, &name, &description, &color, &mut out),
        Commands::RemoveProject { name } => cli::remove_project(&api, &name, &mut out),
        Commands::Quote { title, priority } => {
            cli::quote(api, &title, &priority, &cfg.quote.context, &mut out)
        }
    }
}
