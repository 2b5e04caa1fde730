//! REST client for the Procrastinator backend.
//!
//! [`Api`] is the seam the rest of the crate talks to; [`HttpApi`] is the
//! `reqwest` implementation used at runtime.

#[cfg(test)]
pub mod fake;

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::store::{
    Health, Project, ProjectDraft, QuoteRequest, QuoteResponse, Stats, Task, TaskDraft,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API base URL '{0}'")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Every remote operation the client performs.
pub trait Api {
    fn list_tasks(&self, project_id: Option<&str>) -> ApiResult<Vec<Task>>;
    fn create_task(&self, draft: &TaskDraft) -> ApiResult<Task>;
    /// Replace a task with `task`. The response body is ignored.
    fn update_task(&self, id: &str, task: &Task) -> ApiResult<()>;
    fn delete_task(&self, id: &str) -> ApiResult<()>;

    fn list_projects(&self) -> ApiResult<Vec<Project>>;
    fn create_project(&self, draft: &ProjectDraft) -> ApiResult<Project>;
    fn update_project(&self, id: &str, project: &Project) -> ApiResult<()>;
    /// Delete a project. The server also deletes its tasks.
    fn delete_project(&self, id: &str) -> ApiResult<()>;

    fn stats(&self) -> ApiResult<Stats>;
    fn motivational_quote(&self, request: &QuoteRequest) -> ApiResult<String>;
    fn health(&self) -> ApiResult<Health>;
}

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("procrastinator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpApi { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(ApiError::Status { status, body })
    }

    fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        Ok(self.send(request)?.json()?)
    }
}

impl Api for HttpApi {
    fn list_tasks(&self, project_id: Option<&str>) -> ApiResult<Vec<Task>> {
        let mut request = self.client.get(self.url("tasks"));
        if let Some(id) = project_id {
            request = request.query(&[("project_id", id)]);
        }
        tracing::debug!(?project_id, "fetching tasks");
        self.get_json(request)
    }

    fn create_task(&self, draft: &TaskDraft) -> ApiResult<Task> {
        tracing::debug!(title = %draft.title, "creating task");
        self.get_json(self.client.post(self.url("tasks")).json(draft))
    }

    fn update_task(&self, id: &str, task: &Task) -> ApiResult<()> {
        tracing::debug!(id, status = %task.status, "updating task");
        self.send(self.client.put(self.url(&format!("tasks/{id}"))).json(task))?;
        Ok(())
    }

    fn delete_task(&self, id: &str) -> ApiResult<()> {
        tracing::debug!(id, "deleting task");
        self.send(self.client.delete(self.url(&format!("tasks/{id}"))))?;
        Ok(())
    }

    fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.get_json(self.client.get(self.url("projects")))
    }

    fn create_project(&self, draft: &ProjectDraft) -> ApiResult<Project> {
        tracing::debug!(name = %draft.name, "creating project");
        self.get_json(self.client.post(self.url("projects")).json(draft))
    }

    fn update_project(&self, id: &str, project: &Project) -> ApiResult<()> {
        tracing::debug!(id, "updating project");
        self.send(
            self.client
                .put(self.url(&format!("projects/{id}")))
                .json(project),
        )?;
        Ok(())
    }

    fn delete_project(&self, id: &str) -> ApiResult<()> {
        tracing::debug!(id, "deleting project");
        self.send(self.client.delete(self.url(&format!("projects/{id}"))))?;
        Ok(())
    }

    fn stats(&self) -> ApiResult<Stats> {
        self.get_json(self.client.get(self.url("stats")))
    }

    fn motivational_quote(&self, request: &QuoteRequest) -> ApiResult<String> {
        let response: QuoteResponse = self.get_json(
            self.client
                .post(self.url("motivational-quote"))
                .json(request),
        )?;
        Ok(response.quote)
    }

    fn health(&self) -> ApiResult<Health> {
        self.get_json(self.client.get(self.url("health")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Priority, TaskStatus};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// The blocking client owns its own runtime, so it has to run off the
    /// async test thread.
    async fn blocking<T, F>(base: String, f: F) -> T
    where
        F: FnOnce(HttpApi) -> T + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let api = HttpApi::new(&base, Duration::from_secs(5)).unwrap();
            f(api)
        })
        .await
        .unwrap()
    }

    fn task_json(id: &str, status: &str, project_id: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("task {id}"),
            "description": "",
            "priority": "medium",
            "status": status,
            "due_date": null,
            "project_id": project_id,
            "created_at": "2025-01-01T09:00:00",
            "completed_at": null
        })
    }

    #[test]
    fn new_rejects_non_http_url() {
        assert!(matches!(
            HttpApi::new("localhost:8001", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn new_strips_trailing_slash() {
        let api = HttpApi::new("http://localhost:8001/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8001");
        assert_eq!(api.url("tasks"), "http://localhost:8001/api/tasks");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_tasks_unscoped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                task_json("t1", "todo", None),
                task_json("t2", "completed", Some("p1")),
            ])))
            .mount(&server)
            .await;

        let tasks = blocking(server.uri(), |api| api.list_tasks(None))
            .await
            .unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].status, TaskStatus::Completed);
        assert_eq!(tasks[1].project_id.as_deref(), Some("p1"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_tasks_scoped_sends_project_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(query_param("project_id", "p1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([task_json("t2", "todo", Some("p1"))])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tasks = blocking(server.uri(), |api| api.list_tasks(Some("p1")))
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_task_posts_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks"))
            .and(body_json(json!({
                "title": "Write copy",
                "description": "",
                "priority": "medium",
                "status": "todo",
                "project_id": "p1"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(task_json("t9", "todo", Some("p1"))),
            )
            .mount(&server)
            .await;

        let task = blocking(server.uri(), |api| {
            let mut draft = TaskDraft::titled("Write copy");
            draft.project_id = Some("p1".into());
            api.create_task(&draft)
        })
        .await
        .unwrap();
        assert_eq!(task.id, "t9");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_task_puts_full_task() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/tasks/t1"))
            .and(body_json(json!({
                "id": "t1",
                "title": "Ship it",
                "priority": "high",
                "status": "completed"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ignored": true})))
            .expect(1)
            .mount(&server)
            .await;

        blocking(server.uri(), |api| {
            let task = Task {
                id: "t1".into(),
                title: "Ship it".into(),
                description: None,
                priority: Priority::High,
                status: TaskStatus::Completed,
                due_date: None,
                project_id: None,
                created_at: None,
                completed_at: None,
            };
            api.update_task("t1", &task)
        })
        .await
        .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/tasks/t1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/projects/p1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        blocking(server.uri(), |api| {
            api.delete_task("t1")?;
            api.delete_project("p1")
        })
        .await
        .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/tasks/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Task not found"))
            .mount(&server)
            .await;

        let err = blocking(server.uri(), |api| api.delete_task("missing"))
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body, "Task not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn projects_and_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "p1", "name": "Launch", "description": "", "color": "#a855f7"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_tasks": 4,
                "completed_tasks": 1,
                "in_progress_tasks": 2,
                "total_projects": 1,
                "completion_rate": 25.0
            })))
            .mount(&server)
            .await;

        let (projects, stats) = blocking(server.uri(), |api| {
            (api.list_projects().unwrap(), api.stats().unwrap())
        })
        .await;
        assert_eq!(projects[0].name, "Launch");
        assert_eq!(stats.in_progress_tasks, 2);
        assert!((stats.completion_rate() - 25.0).abs() < f64::EPSILON);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_and_update_project() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/projects"))
            .and(body_json(json!({
                "name": "Launch",
                "description": "",
                "color": "#a855f7"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "p1", "name": "Launch", "description": "", "color": "#a855f7"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/projects/p1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let project = blocking(server.uri(), |api| {
            let project = api.create_project(&ProjectDraft::named("Launch")).unwrap();
            let renamed = Project {
                name: "Relaunch".into(),
                ..project.clone()
            };
            api.update_project(&project.id, &renamed).unwrap();
            project
        })
        .await;
        assert_eq!(project.id, "p1");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn motivational_quote_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/motivational-quote"))
            .and(body_json(json!({
                "task_title": "Write copy",
                "priority": "high",
                "context": "stay focused"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "quote": "Start where you are.",
                "task": "Write copy"
            })))
            .mount(&server)
            .await;

        let quote = blocking(server.uri(), |api| {
            api.motivational_quote(&QuoteRequest {
                task_title: "Write copy".into(),
                priority: Priority::High,
                context: "stay focused".into(),
            })
        })
        .await
        .unwrap();
        assert_eq!(quote, "Start where you are.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "timestamp": "2025-01-01T00:00:00"
            })))
            .mount(&server)
            .await;

        let health = blocking(server.uri(), |api| api.health()).await.unwrap();
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreachable_server_is_transport_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let err = blocking(uri, |api| api.stats()).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
