mod board;
mod models;

pub use board::*;
pub use models::*;

use crate::api::{Api, ApiError};

/// Which cached collections a successful mutation makes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Refresh {
    pub tasks: bool,
    pub projects: bool,
    pub stats: bool,
}

impl Refresh {
    pub const ALL: Refresh = Refresh {
        tasks: true,
        projects: true,
        stats: true,
    };
}

/// Every write the client can make against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateTask,
    UpdateTask,
    DeleteTask,
    CreateProject,
    UpdateProject,
    DeleteProject,
}

impl Mutation {
    /// The re-fetch contract: after a successful mutation these collections
    /// are fetched again in full. Nothing is patched locally.
    pub fn invalidates(self) -> Refresh {
        match self {
            Mutation::CreateTask | Mutation::UpdateTask | Mutation::DeleteTask => Refresh {
                tasks: true,
                projects: false,
                stats: true,
            },
            Mutation::CreateProject => Refresh {
                tasks: false,
                projects: true,
                stats: true,
            },
            Mutation::UpdateProject => Refresh {
                tasks: false,
                projects: true,
                stats: false,
            },
            // The server drops the project's tasks along with it.
            Mutation::DeleteProject => Refresh::ALL,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Mutation::CreateTask => "create task",
            Mutation::UpdateTask => "update task",
            Mutation::DeleteTask => "delete task",
            Mutation::CreateProject => "create project",
            Mutation::UpdateProject => "update project",
            Mutation::DeleteProject => "delete project",
        }
    }
}

/// In-memory copy of the server's tasks, projects and stats.
///
/// Failures are logged and swallowed: callers get `None`/`false` and the
/// cached collections keep their last successfully fetched contents.
pub struct Store<A> {
    api: A,
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub stats: Stats,
    /// Project the task collection is currently filtered to.
    task_scope: Option<String>,
}

impl<A: Api> Store<A> {
    pub fn new(api: A) -> Self {
        Store {
            api,
            tasks: Vec::new(),
            projects: Vec::new(),
            stats: Stats::default(),
            task_scope: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn task_scope(&self) -> Option<&str> {
        self.task_scope.as_deref()
    }

    /// Initial load of all three collections.
    pub fn load(&mut self) {
        self.refresh(Refresh::ALL);
    }

    pub fn refresh(&mut self, refresh: Refresh) {
        if refresh.tasks {
            let scope = self.task_scope.clone();
            self.fetch_tasks(scope.as_deref());
        }
        if refresh.projects {
            self.fetch_projects();
        }
        if refresh.stats {
            self.fetch_stats();
        }
    }

    /// Fetch tasks, optionally filtered to one project. The scope sticks for
    /// later re-fetches even if this request fails.
    pub fn fetch_tasks(&mut self, project_id: Option<&str>) -> bool {
        self.task_scope = project_id.map(str::to_string);
        match self.api.list_tasks(project_id) {
            Ok(tasks) => {
                self.tasks = tasks;
                true
            }
            Err(e) => {
                log_failure("fetch tasks", &e);
                false
            }
        }
    }

    pub fn fetch_projects(&mut self) -> bool {
        match self.api.list_projects() {
            Ok(projects) => {
                self.projects = projects;
                true
            }
            Err(e) => {
                log_failure("fetch projects", &e);
                false
            }
        }
    }

    pub fn fetch_stats(&mut self) -> bool {
        match self.api.stats() {
            Ok(stats) => {
                self.stats = stats;
                true
            }
            Err(e) => {
                log_failure("fetch stats", &e);
                false
            }
        }
    }

    /// Run a mutation and, if it succeeded, re-fetch what it invalidated.
    fn mutate<T>(
        &mut self,
        mutation: Mutation,
        call: impl FnOnce(&A) -> Result<T, ApiError>,
    ) -> Option<T> {
        match call(&self.api) {
            Ok(value) => {
                tracing::info!(operation = mutation.as_str(), "mutation succeeded");
                self.refresh(mutation.invalidates());
                Some(value)
            }
            Err(e) => {
                log_failure(mutation.as_str(), &e);
                None
            }
        }
    }

    // ── Tasks ──

    pub fn create_task(&mut self, draft: &TaskDraft) -> Option<Task> {
        self.mutate(Mutation::CreateTask, |api| api.create_task(draft))
    }

    pub fn update_task(&mut self, task: &Task) -> bool {
        self.mutate(Mutation::UpdateTask, |api| api.update_task(&task.id, task))
            .is_some()
    }

    /// Persist a new status; every other field is sent back unchanged.
    pub fn set_task_status(&mut self, task: &Task, status: TaskStatus) -> bool {
        self.update_task(&task.with_status(status))
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        self.mutate(Mutation::DeleteTask, |api| api.delete_task(id))
            .is_some()
    }

    // ── Projects ──

    pub fn create_project(&mut self, draft: &ProjectDraft) -> Option<Project> {
        self.mutate(Mutation::CreateProject, |api| api.create_project(draft))
    }

    pub fn update_project(&mut self, project: &Project) -> bool {
        self.mutate(Mutation::UpdateProject, |api| {
            api.update_project(&project.id, project)
        })
        .is_some()
    }

    pub fn delete_project(&mut self, id: &str) -> bool {
        self.mutate(Mutation::DeleteProject, |api| api.delete_project(id))
            .is_some()
    }

    // ── Quotes ──

    /// Ask the backend for a quote; any failure yields [`FALLBACK_QUOTE`].
    pub fn motivational_quote(&self, task_title: &str, priority: Priority, context: &str) -> String {
        let request = QuoteRequest {
            task_title: task_title.to_string(),
            priority,
            context: context.to_string(),
        };
        match self.api.motivational_quote(&request) {
            Ok(quote) if !quote.trim().is_empty() => quote,
            Ok(_) => FALLBACK_QUOTE.to_string(),
            Err(e) => {
                log_failure("get motivational quote", &e);
                FALLBACK_QUOTE.to_string()
            }
        }
    }

    // ── Derived views ──

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Tasks that belong to no project.
    pub fn unassigned_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.project_id.is_none()).collect()
    }

    pub fn project_tasks(&self, project_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(project_id))
            .collect()
    }

    pub fn project_counts(&self, project_id: &str) -> ProjectCounts {
        let tasks = self.project_tasks(project_id);
        ProjectCounts {
            total: tasks.len(),
            completed: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
        }
    }
}

fn log_failure(operation: &str, error: &ApiError) {
    tracing::error!(operation, %error, "operation failed");
}
