//! In-memory stand-in for the backend, used by store and TUI tests.

use std::cell::{Cell, RefCell};

use reqwest::StatusCode;

use super::{Api, ApiError, ApiResult};
use crate::store::{
    Health, Project, ProjectDraft, QuoteRequest, Stats, Task, TaskDraft, TaskStatus,
};

#[derive(Default)]
pub struct FakeApi {
    pub tasks: RefCell<Vec<Task>>,
    pub projects: RefCell<Vec<Project>>,
    /// Every call, as `"METHOD path"`, in order.
    pub calls: RefCell<Vec<String>>,
    /// When set, every call fails with a 500.
    pub failing: Cell<bool>,
    pub quote: RefCell<Option<String>>,
    next_id: Cell<u32>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.get() {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            });
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{prefix}{id}")
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: format!("{what} not found"),
        }
    }
}

impl Api for FakeApi {
    fn list_tasks(&self, project_id: Option<&str>) -> ApiResult<Vec<Task>> {
        match project_id {
            Some(id) => self.record(format!("GET /api/tasks?project_id={id}"))?,
            None => self.record("GET /api/tasks".into())?,
        }
        Ok(self
            .tasks
            .borrow()
            .iter()
            .filter(|t| project_id.is_none() || t.project_id.as_deref() == project_id)
            .cloned()
            .collect())
    }

    fn create_task(&self, draft: &TaskDraft) -> ApiResult<Task> {
        self.record("POST /api/tasks".into())?;
        let task = Task {
            id: self.next_id("t"),
            title: draft.title.clone(),
            description: Some(draft.description.clone()),
            priority: draft.priority,
            status: draft.status,
            due_date: draft.due_date.clone(),
            project_id: draft.project_id.clone(),
            created_at: Some("2025-01-01T09:00:00".into()),
            completed_at: None,
        };
        self.tasks.borrow_mut().push(task.clone());
        Ok(task)
    }

    fn update_task(&self, id: &str, task: &Task) -> ApiResult<()> {
        self.record(format!("PUT /api/tasks/{id}"))?;
        let mut tasks = self.tasks.borrow_mut();
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found("Task"))?;
        *slot = Task {
            id: id.to_string(),
            ..task.clone()
        };
        Ok(())
    }

    fn delete_task(&self, id: &str) -> ApiResult<()> {
        self.record(format!("DELETE /api/tasks/{id}"))?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(Self::not_found("Task"));
        }
        Ok(())
    }

    fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.record("GET /api/projects".into())?;
        Ok(self.projects.borrow().clone())
    }

    fn create_project(&self, draft: &ProjectDraft) -> ApiResult<Project> {
        self.record("POST /api/projects".into())?;
        let project = Project {
            id: self.next_id("p"),
            name: draft.name.clone(),
            description: Some(draft.description.clone()),
            color: draft.color.clone(),
            created_at: Some("2025-01-01T09:00:00".into()),
        };
        self.projects.borrow_mut().push(project.clone());
        Ok(project)
    }

    fn update_project(&self, id: &str, project: &Project) -> ApiResult<()> {
        self.record(format!("PUT /api/projects/{id}"))?;
        let mut projects = self.projects.borrow_mut();
        let slot = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::not_found("Project"))?;
        *slot = project.clone();
        Ok(())
    }

    fn delete_project(&self, id: &str) -> ApiResult<()> {
        self.record(format!("DELETE /api/projects/{id}"))?;
        self.tasks
            .borrow_mut()
            .retain(|t| t.project_id.as_deref() != Some(id));
        let mut projects = self.projects.borrow_mut();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(Self::not_found("Project"));
        }
        Ok(())
    }

    fn stats(&self) -> ApiResult<Stats> {
        self.record("GET /api/stats".into())?;
        let tasks = self.tasks.borrow();
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count() as u64;
        Ok(Stats {
            total_tasks: tasks.len() as u64,
            completed_tasks: count(TaskStatus::Completed),
            in_progress_tasks: count(TaskStatus::InProgress),
            total_projects: self.projects.borrow().len() as u64,
            completion_rate: None,
        })
    }

    fn motivational_quote(&self, request: &QuoteRequest) -> ApiResult<String> {
        self.record("POST /api/motivational-quote".into())?;
        Ok(self
            .quote
            .borrow()
            .clone()
            .unwrap_or_else(|| format!("Go finish '{}'!", request.task_title)))
    }

    fn health(&self) -> ApiResult<Health> {
        self.record("GET /api/health".into())?;
        Ok(Health {
            status: "healthy".into(),
            timestamp: None,
        })
    }
}
