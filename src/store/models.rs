use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT_COLOR: &str = "#a855f7";

/// Shown whenever the quote endpoint cannot produce a quote.
pub const FALLBACK_QUOTE: &str =
    "You've got this! Every small step counts towards your goal. Start now, start today!";

pub const DEFAULT_QUOTE_CONTEXT: &str =
    "Help me stay motivated to complete this task and beat procrastination";

/// Due dates travel as local date-times without seconds (`2025-01-31T17:00`).
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Lenient parse used for server payloads: unknown values become `Medium`.
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Step to the next priority, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "unknown priority '{other}' (expected low, medium or high)"
            )),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::from_str_lossy(&s)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Board column order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "☐",
            TaskStatus::InProgress => "●",
            TaskStatus::Completed => "✓",
        }
    }

    /// Position of this status in [`TaskStatus::ALL`].
    pub fn index(&self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!(
                "unknown status '{other}' (expected todo, in_progress or completed)"
            )),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        TaskStatus::from_str_lossy(&s)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Task {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Copy of this task with only the status replaced.
    pub fn with_status(&self, status: TaskStatus) -> Task {
        Task {
            status,
            ..self.clone()
        }
    }

    /// Due date rendered as a plain date, or the raw string if it does not parse.
    pub fn due_label(&self) -> Option<String> {
        let raw = self.due_date.as_deref().filter(|d| !d.is_empty())?;
        Some(match parse_due_date(raw) {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => raw.to_string(),
        })
    }
}

/// Payload for creating a task, and the field set a task edit overwrites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub project_id: Option<String>,
}

impl TaskDraft {
    /// A draft with only a title; everything else takes its default.
    pub fn titled(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            due_date: None,
            project_id: None,
        }
    }

    /// Overlay the editable fields onto an existing task. Status, id and
    /// timestamps are kept from `task`.
    pub fn apply_to(&self, task: &Task) -> Task {
        Task {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            priority: self.priority,
            due_date: self.due_date.clone(),
            project_id: self.project_id.clone().or_else(|| task.project_id.clone()),
            ..task.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Project {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl ProjectDraft {
    pub fn named(name: impl Into<String>) -> Self {
        ProjectDraft {
            name: name.into(),
            description: String::new(),
            color: default_color(),
        }
    }

    pub fn apply_to(&self, project: &Project) -> Project {
        Project {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            color: self.color.clone(),
            ..project.clone()
        }
    }
}

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex colour regex is valid"));

/// Project colours are stored as `#rrggbb`.
pub fn is_hex_color(s: &str) -> bool {
    HEX_COLOR.is_match(s)
}

fn default_color() -> String {
    DEFAULT_PROJECT_COLOR.to_string()
}

/// Derived per-project numbers shown on project cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectCounts {
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    pub total_projects: u64,
    pub completion_rate: Option<f64>,
}

impl Stats {
    /// Percentage of completed tasks, rounded to one decimal.
    pub fn completion_rate(&self) -> f64 {
        if let Some(rate) = self.completion_rate {
            return rate;
        }
        if self.total_tasks == 0 {
            return 0.0;
        }
        let rate = self.completed_tasks as f64 / self.total_tasks as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRequest {
    pub task_title: String,
    pub priority: Priority,
    pub context: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteResponse {
    pub quote: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Parse a due date as typed by a user or stored by the server.
///
/// Accepts `YYYY-MM-DDTHH:MM`, the same with a space separator, optional
/// seconds, and a bare date (taken as midnight).
pub fn parse_due_date(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    for fmt in [
        DUE_DATE_FORMAT,
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Normalize user input into the wire format. Empty input means "no due date".
pub fn normalize_due_date(input: &str) -> Result<Option<String>, String> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_due_date(input)
        .map(|dt| Some(dt.format(DUE_DATE_FORMAT).to_string()))
        .ok_or_else(|| format!("invalid due date '{}' (use YYYY-MM-DD HH:MM)", input.trim()))
}
