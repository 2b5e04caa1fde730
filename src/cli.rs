//! Bodies of the non-interactive subcommands.
//!
//! Every command talks to the backend through [`Api`] and writes plain text
//! to `out`. API failures are returned with context so the process exits
//! non-zero.

use std::io::Write;

use anyhow::{Context, Result, bail};

use crate::api::Api;
use crate::store::{
    Priority, Project, ProjectDraft, Store, TaskDraft, TaskStatus, is_hex_color,
    normalize_due_date,
};

pub fn list_tasks(api: &impl Api, project: Option<&str>, out: &mut impl Write) -> Result<()> {
    let project = project
        .map(|name| find_project_by_name(api, name))
        .transpose()?;
    let tasks = api
        .list_tasks(project.as_ref().map(|p| p.id.as_str()))
        .context("failed to list tasks")?;

    if tasks.is_empty() {
        match &project {
            Some(p) => writeln!(out, "No tasks for '{}'.", p.name)?,
            None => writeln!(out, "No tasks. Use `procrastinator add-task <title>` to add one.")?,
        }
        return Ok(());
    }
    for t in &tasks {
        let due = t.due_label().map(|d| format!(" due {d}")).unwrap_or_default();
        writeln!(
            out,
            "  {} {} [{}] ({}){due}  {}",
            t.status.symbol(),
            t.title,
            t.status.as_str(),
            t.priority.as_str(),
            t.id,
        )?;
    }
    Ok(())
}

pub fn list_projects(api: &impl Api, out: &mut impl Write) -> Result<()> {
    let projects = api.list_projects().context("failed to list projects")?;
    if projects.is_empty() {
        writeln!(out, "No projects. Use `procrastinator add-project <name>` to add one.")?;
        return Ok(());
    }
    let tasks = api.list_tasks(None).context("failed to list tasks")?;
    for p in &projects {
        let mine: Vec<_> = tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(p.id.as_str()))
            .collect();
        let completed = mine
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        writeln!(
            out,
            "  {} ({}) · {} tasks · {completed} completed  {}",
            p.name,
            p.color,
            mine.len(),
            p.id
        )?;
    }
    Ok(())
}

pub fn stats(api: &impl Api, out: &mut impl Write) -> Result<()> {
    let stats = api.stats().context("failed to fetch stats")?;
    writeln!(out, "Stats:")?;
    writeln!(out, "  Total tasks:     {}", stats.total_tasks)?;
    writeln!(out, "  Completed:       {}", stats.completed_tasks)?;
    writeln!(out, "  In progress:     {}", stats.in_progress_tasks)?;
    writeln!(out, "  Projects:        {}", stats.total_projects)?;
    writeln!(out, "  Completion rate: {:.1}%", stats.completion_rate())?;
    Ok(())
}

pub fn health(api: &impl Api, base_url: &str, out: &mut impl Write) -> Result<()> {
    let health = api.health().context("backend is not reachable")?;
    match health.timestamp {
        Some(ts) => writeln!(out, "{} ({ts}) at {base_url}", health.status)?,
        None => writeln!(out, "{} at {base_url}", health.status)?,
    }
    Ok(())
}

/// Create a task. Input is validated the same way the task form does it.
pub fn add_task(
    api: &impl Api,
    title: &str,
    description: &str,
    priority: &str,
    due: Option<&str>,
    project: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        bail!("task title must not be empty");
    }
    let priority: Priority = priority.parse().map_err(anyhow::Error::msg)?;
    let due_date = normalize_due_date(due.unwrap_or_default()).map_err(anyhow::Error::msg)?;
    let project = project
        .map(|name| find_project_by_name(api, name))
        .transpose()?;

    let draft = TaskDraft {
        description: description.trim().to_string(),
        priority,
        due_date,
        project_id: project.as_ref().map(|p| p.id.clone()),
        ..TaskDraft::titled(title)
    };
    let task = api.create_task(&draft).context("failed to create task")?;
    match &project {
        Some(p) => writeln!(out, "Created task '{}' ({}) in '{}'", task.title, task.id, p.name)?,
        None => writeln!(out, "Created task '{}' ({})", task.title, task.id)?,
    }
    Ok(())
}

/// Change one task's status, sending every other field back unchanged.
pub fn set_status(api: &impl Api, id: &str, status: &str, out: &mut impl Write) -> Result<()> {
    let status: TaskStatus = status.parse().map_err(anyhow::Error::msg)?;
    let task = api
        .list_tasks(None)
        .context("failed to list tasks")?
        .into_iter()
        .find(|t| t.id == id)
        .with_context(|| format!("task '{id}' not found"))?;
    api.update_task(&task.id, &task.with_status(status))
        .context("failed to update task")?;
    writeln!(out, "'{}' is now {}", task.title, status.label())?;
    Ok(())
}

pub fn delete_task(api: &impl Api, id: &str, out: &mut impl Write) -> Result<()> {
    api.delete_task(id).context("failed to delete task")?;
    writeln!(out, "Deleted task {id}")?;
    Ok(())
}

pub fn add_project(
    api: &impl Api,
    name: &str,
    description: &str,
    color: &str,
    out: &mut impl Write,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("project name must not be empty");
    }
    let color = color.trim();
    if !is_hex_color(color) {
        bail!("invalid colour '{color}' (use #rrggbb)");
    }
    let draft = ProjectDraft {
        description: description.trim().to_string(),
        color: color.to_lowercase(),
        ..ProjectDraft::named(name)
    };
    let project = api.create_project(&draft).context("failed to create project")?;
    writeln!(out, "Added project '{}' ({})", project.name, project.id)?;
    Ok(())
}

/// Delete a project by name. The backend removes its tasks too.
pub fn remove_project(api: &impl Api, name: &str, out: &mut impl Write) -> Result<()> {
    let project = find_project_by_name(api, name)?;
    api.delete_project(&project.id)
        .context("failed to delete project")?;
    writeln!(out, "Removed project '{}'", project.name)?;
    Ok(())
}

/// Print a motivational quote. Never fails on the backend's account: a
/// failed request prints the fallback quote.
pub fn quote<A: Api>(
    api: A,
    title: &str,
    priority: &str,
    context: &str,
    out: &mut impl Write,
) -> Result<()> {
    let priority: Priority = priority.parse().map_err(anyhow::Error::msg)?;
    let quotes = Store::new(api);
    writeln!(out, "{}", quotes.motivational_quote(title, priority, context))?;
    Ok(())
}

pub fn find_project_by_name(api: &impl Api, name: &str) -> Result<Project> {
    let projects: Vec<Project> = api.list_projects().context("failed to list projects")?;
    projects
        .into_iter()
        .find(|p| p.name == name)
        .with_context(|| format!("project '{name}' not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::store::{DEFAULT_QUOTE_CONTEXT, FALLBACK_QUOTE, Task};

    fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn with_project(api: &FakeApi, name: &str) -> Project {
        api.create_project(&ProjectDraft::named(name)).unwrap()
    }

    fn task_in(api: &FakeApi, title: &str, project: Option<&Project>) -> Task {
        let mut draft = TaskDraft::titled(title);
        draft.project_id = project.map(|p| p.id.clone());
        api.create_task(&draft).unwrap()
    }

    #[test]
    fn list_tasks_by_project_name() {
        let api = FakeApi::new();
        let launch = with_project(&api, "Launch");
        task_in(&api, "Write copy", Some(&launch));
        task_in(&api, "Taxes", None);
        api.clear_calls();

        let text = output(|out| list_tasks(&api, Some("Launch"), out));
        assert!(text.contains("Write copy"));
        assert!(!text.contains("Taxes"));
        assert_eq!(
            api.calls(),
            [
                "GET /api/projects".to_string(),
                format!("GET /api/tasks?project_id={}", launch.id),
            ]
        );
    }

    #[test]
    fn list_tasks_unknown_project_is_an_error() {
        let api = FakeApi::new();
        let err = list_tasks(&api, Some("Nope"), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("project 'Nope' not found"));
    }

    #[test]
    fn list_tasks_empty_hint() {
        let api = FakeApi::new();
        let launch = with_project(&api, "Launch");
        assert!(output(|out| list_tasks(&api, None, out)).starts_with("No tasks."));
        assert_eq!(
            output(|out| list_tasks(&api, Some(launch.name.as_str()), out)),
            "No tasks for 'Launch'.\n"
        );
    }

    #[test]
    fn list_projects_shows_derived_counts() {
        let api = FakeApi::new();
        let launch = with_project(&api, "Launch");
        let done = task_in(&api, "a", Some(&launch));
        task_in(&api, "b", Some(&launch));
        task_in(&api, "loose", None);
        api.update_task(&done.id, &done.with_status(TaskStatus::Completed))
            .unwrap();

        let text = output(|out| list_projects(&api, out));
        assert!(text.contains("Launch (#a855f7) · 2 tasks · 1 completed"));
    }

    #[test]
    fn list_projects_empty_hint() {
        let api = FakeApi::new();
        assert!(output(|out| list_projects(&api, out)).starts_with("No projects."));
    }

    #[test]
    fn stats_prints_completion_rate() {
        let api = FakeApi::new();
        let done = task_in(&api, "a", None);
        task_in(&api, "b", None);
        api.update_task(&done.id, &done.with_status(TaskStatus::Completed))
            .unwrap();

        let text = output(|out| stats(&api, out));
        assert!(text.contains("Total tasks:     2"));
        assert!(text.contains("Completion rate: 50.0%"));
    }

    #[test]
    fn health_names_the_backend() {
        let api = FakeApi::new();
        let text = output(|out| health(&api, "http://localhost:8001", out));
        assert_eq!(text, "healthy at http://localhost:8001\n");
    }

    #[test]
    fn add_task_builds_the_same_draft_as_the_form() {
        let api = FakeApi::new();
        let launch = with_project(&api, "Launch");

        let text = output(|out| {
            add_task(
                &api,
                "  Write copy  ",
                " short ",
                "high",
                Some("2025-03-01 17:00"),
                Some("Launch"),
                out,
            )
        });
        assert!(text.starts_with("Created task 'Write copy'"));

        let task = api.tasks.borrow()[0].clone();
        assert_eq!(task.title, "Write copy");
        assert_eq!(task.description(), "short");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.due_date.as_deref(), Some("2025-03-01T17:00"));
        assert_eq!(task.project_id.as_deref(), Some(launch.id.as_str()));
    }

    #[test]
    fn add_task_defaults() {
        let api = FakeApi::new();
        add_task(&api, "Taxes", "", "medium", None, None, &mut Vec::new()).unwrap();
        let task = api.tasks.borrow()[0].clone();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.due_date.is_none());
        assert!(task.project_id.is_none());
    }

    #[test]
    fn add_task_rejects_bad_input_before_calling_the_backend() {
        let api = FakeApi::new();
        let mut out = Vec::new();
        assert!(add_task(&api, "   ", "", "medium", None, None, &mut out).is_err());
        assert!(add_task(&api, "x", "", "urgent", None, None, &mut out).is_err());
        assert!(add_task(&api, "x", "", "low", Some("tomorrow"), None, &mut out).is_err());
        assert!(api.calls().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn add_task_unknown_project_creates_nothing() {
        let api = FakeApi::new();
        let err = add_task(&api, "x", "", "low", None, Some("Nope"), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(api.tasks.borrow().is_empty());
    }

    #[test]
    fn set_status_changes_only_the_status() {
        let api = FakeApi::new();
        let mut draft = TaskDraft::titled("Ship");
        draft.priority = Priority::High;
        draft.description = "everything".into();
        let before = api.create_task(&draft).unwrap();
        api.clear_calls();

        let text = output(|out| set_status(&api, &before.id, "in-progress", out));
        assert_eq!(text, "'Ship' is now In Progress\n");
        assert_eq!(
            api.calls(),
            [
                "GET /api/tasks".to_string(),
                format!("PUT /api/tasks/{}", before.id),
            ]
        );
        assert_eq!(
            api.tasks.borrow()[0],
            before.with_status(TaskStatus::InProgress)
        );
    }

    #[test]
    fn set_status_errors() {
        let api = FakeApi::new();
        let task = task_in(&api, "Ship", None);
        api.clear_calls();

        assert!(set_status(&api, &task.id, "done", &mut Vec::new()).is_err());
        assert!(api.calls().is_empty());

        let err = set_status(&api, "missing", "completed", &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("task 'missing' not found"));
    }

    #[test]
    fn delete_task_reports_backend_failure() {
        let api = FakeApi::new();
        let task = task_in(&api, "Ship", None);

        delete_task(&api, &task.id, &mut Vec::new()).unwrap();
        assert!(api.tasks.borrow().is_empty());

        let err = delete_task(&api, &task.id, &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "failed to delete task");
    }

    #[test]
    fn add_project_validates_colour() {
        let api = FakeApi::new();
        let err = add_project(&api, "Launch", "", "purple", &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("invalid colour"));
        assert!(add_project(&api, "  ", "", "#a855f7", &mut Vec::new()).is_err());
        assert!(api.calls().is_empty());

        add_project(&api, "Launch", "", "#A855F7", &mut Vec::new()).unwrap();
        assert_eq!(api.projects.borrow()[0].color, "#a855f7");
    }

    #[test]
    fn remove_project_by_name_cascades() {
        let api = FakeApi::new();
        let launch = with_project(&api, "Launch");
        task_in(&api, "Write copy", Some(&launch));
        task_in(&api, "Taxes", None);

        let text = output(|out| remove_project(&api, "Launch", out));
        assert_eq!(text, "Removed project 'Launch'\n");
        assert!(api.projects.borrow().is_empty());
        assert_eq!(api.tasks.borrow().len(), 1);

        assert!(remove_project(&api, "Launch", &mut Vec::new()).is_err());
    }

    #[test]
    fn backend_failure_propagates() {
        let api = FakeApi::new();
        api.fail(true);
        let mut out = Vec::new();
        assert!(list_projects(&api, &mut out).is_err());
        assert!(stats(&api, &mut out).is_err());
        assert!(health(&api, "http://localhost:8001", &mut out).is_err());
        assert!(add_project(&api, "Launch", "", "#a855f7", &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn quote_falls_back_when_backend_fails() {
        let api = FakeApi::new();
        let text = output(|out| quote(api, "Taxes", "high", DEFAULT_QUOTE_CONTEXT, out));
        assert_eq!(text, "Go finish 'Taxes'!\n");

        let api = FakeApi::new();
        api.fail(true);
        let text = output(|out| quote(api, "Taxes", "high", DEFAULT_QUOTE_CONTEXT, out));
        assert_eq!(text, format!("{FALLBACK_QUOTE}\n"));
    }

    #[test]
    fn quote_rejects_unknown_priority() {
        let mut out = Vec::new();
        let result = quote(FakeApi::new(), "Taxes", "asap", DEFAULT_QUOTE_CONTEXT, &mut out);
        assert!(result.is_err());
    }
}
