use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::store::{
    DEFAULT_PROJECT_COLOR, Priority, Project, ProjectDraft, Task, TaskDraft, TaskStatus,
    is_hex_color, normalize_due_date, parse_due_date,
};

// ── Text editing helpers ──────────────────────────────────────────────

/// Find the byte offset of the previous word boundary (for word-left navigation).
pub fn word_boundary_left(s: &str, pos: usize) -> usize {
    let before = &s[..pos];
    // Skip trailing whitespace
    let trimmed = before.trim_end();
    if trimmed.is_empty() {
        return 0;
    }
    // Find last whitespace char before the word
    match trimmed.rfind(|c: char| c.is_whitespace()) {
        Some(idx) => idx + trimmed[idx..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}

/// Find the byte offset of the next word boundary (for word-right navigation).
pub fn word_boundary_right(s: &str, pos: usize) -> usize {
    let after = &s[pos..];
    // Skip leading non-whitespace (rest of current word)
    let ws_start = after.find(|c: char| c.is_whitespace());
    match ws_start {
        None => s.len(),
        Some(offset) => {
            let from_ws = &after[offset..];
            // Skip whitespace to find start of next word
            match from_ws.find(|c: char| !c.is_whitespace()) {
                None => s.len(),
                Some(word_start) => pos + offset + word_start,
            }
        }
    }
}

/// Apply standard text-editing shortcuts to a string buffer with cursor tracking.
/// Handles character insertion, deletion, cursor movement (arrow keys, word/line jumps),
/// and line deletion (Super+Backspace / Ctrl+U).
/// Returns `true` if the key event was consumed.
pub fn apply_text_edit(
    buf: &mut String,
    cursor: &mut usize,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    // Safety: clamp cursor to buffer length
    *cursor = (*cursor).min(buf.len());

    match code {
        // --- Cursor movement ---
        KeyCode::Left if modifiers.contains(KeyModifiers::SUPER) => {
            *cursor = 0;
            true
        }
        KeyCode::Left if modifiers.contains(KeyModifiers::ALT) => {
            *cursor = word_boundary_left(buf, *cursor);
            true
        }
        KeyCode::Left => {
            if *cursor > 0 {
                let before = &buf[..*cursor];
                if let Some(ch) = before.chars().next_back() {
                    *cursor -= ch.len_utf8();
                }
            }
            true
        }
        KeyCode::Right if modifiers.contains(KeyModifiers::SUPER) => {
            *cursor = buf.len();
            true
        }
        KeyCode::Right if modifiers.contains(KeyModifiers::ALT) => {
            *cursor = word_boundary_right(buf, *cursor);
            true
        }
        KeyCode::Right => {
            if let Some(ch) = buf[*cursor..].chars().next() {
                *cursor += ch.len_utf8();
            }
            true
        }
        KeyCode::Home => {
            *cursor = 0;
            true
        }
        KeyCode::End => {
            *cursor = buf.len();
            true
        }

        // --- Deletion ---
        KeyCode::Backspace if modifiers.contains(KeyModifiers::ALT) => {
            let new_pos = word_boundary_left(buf, *cursor);
            buf.drain(new_pos..*cursor);
            *cursor = new_pos;
            true
        }
        KeyCode::Backspace if modifiers.contains(KeyModifiers::SUPER) => {
            buf.drain(..*cursor);
            *cursor = 0;
            true
        }
        KeyCode::Char('w') if modifiers.contains(KeyModifiers::CONTROL) => {
            let new_pos = word_boundary_left(buf, *cursor);
            buf.drain(new_pos..*cursor);
            *cursor = new_pos;
            true
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            buf.drain(..*cursor);
            *cursor = 0;
            true
        }
        KeyCode::Backspace => {
            if *cursor > 0 {
                let before = &buf[..*cursor];
                if let Some(ch) = before.chars().next_back() {
                    let new_pos = *cursor - ch.len_utf8();
                    buf.drain(new_pos..*cursor);
                    *cursor = new_pos;
                }
            }
            true
        }
        KeyCode::Delete => {
            if let Some(ch) = buf[*cursor..].chars().next() {
                buf.drain(*cursor..(*cursor + ch.len_utf8()));
            }
            true
        }

        // --- Character insertion ---
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            buf.insert(*cursor, c);
            *cursor += c.len_utf8();
            true
        }
        _ => false,
    }
}

/// Format a text buffer with a visible block cursor at the given position.
pub fn format_with_cursor(buf: &str, cursor: usize) -> String {
    let pos = cursor.min(buf.len());
    let (before, after) = buf.split_at(pos);
    format!("{before}\u{2588}{after}")
}

// ── Rendering helpers ─────────────────────────────────────────────────

/// Render a centered modal overlay: `Clear` background, bordered block, returns inner `Rect`.
///
/// Centres a panel of the given `width`×`height` on screen, clamping to available space.
/// The caller gets back the usable inner area (inside borders).
pub fn render_modal(
    frame: &mut Frame,
    title: &str,
    border_color: Style,
    width: u16,
    height: u16,
) -> Rect {
    let area = frame.area();
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(w)) / 2;
    let y = (area.height.saturating_sub(h)) / 2;
    let panel = Rect::new(x, y, w, h);

    frame.render_widget(Clear, panel);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_color);
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    inner
}

/// Measure how many visual lines a paragraph of `text` would occupy at `width`,
/// using ratatui's own word-wrapping (consistent with `Wrap { trim: false }`).
/// Returns at least 1.
pub fn measure_wrapped_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .line_count(width)
        .max(1) as u16
}

/// Render a horizontal hint bar: alternating key/description spans.
///
/// Each `(key_label, description)` pair is rendered as:
///   `Span::styled(key_label, key_style)` + `Span::styled(description, desc_style)`
pub fn render_hints(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    key_style: Style,
    desc_style: Style,
) {
    let spans: Vec<Span<'_>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(*key, key_style),
                Span::styled(*desc, desc_style),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Form state ────────────────────────────────────────────────────────

/// What a form wants the caller to do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome<T> {
    Pending,
    Cancelled,
    Submitted(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Priority,
    Due,
    Description,
}

impl TaskField {
    pub const ALL: [TaskField; 4] = [
        TaskField::Title,
        TaskField::Priority,
        TaskField::Due,
        TaskField::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::Priority => "Priority",
            TaskField::Due => "Due",
            TaskField::Description => "Description",
        }
    }
}

/// Create/edit form for a task.
#[derive(Debug, Clone)]
pub struct TaskForm {
    /// The task being edited; `None` when creating.
    pub editing: Option<Task>,
    pub field: TaskField,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due: String,
    pub cursor: usize,
    pub error: Option<String>,
    project_id: Option<String>,
}

impl TaskForm {
    /// Empty form. New tasks land in `project_id` when one is given.
    pub fn create(project_id: Option<String>) -> Self {
        TaskForm {
            editing: None,
            field: TaskField::Title,
            title: String::new(),
            description: String::new(),
            priority: Priority::default(),
            due: String::new(),
            cursor: 0,
            error: None,
            project_id,
        }
    }

    /// Form prefilled from `task`. The selected project, if any, wins over
    /// the task's own project.
    pub fn edit(task: &Task, selected_project: Option<&str>) -> Self {
        let due = task
            .due_date
            .as_deref()
            .map(|raw| match parse_due_date(raw) {
                Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
                None => raw.to_string(),
            })
            .unwrap_or_default();
        TaskForm {
            editing: Some(task.clone()),
            field: TaskField::Title,
            title: task.title.clone(),
            description: task.description().to_string(),
            priority: task.priority,
            due,
            cursor: task.title.len(),
            error: None,
            project_id: selected_project
                .map(str::to_string)
                .or_else(|| task.project_id.clone()),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn buffer_mut(&mut self, field: TaskField) -> Option<&mut String> {
        match field {
            TaskField::Title => Some(&mut self.title),
            TaskField::Due => Some(&mut self.due),
            TaskField::Description => Some(&mut self.description),
            TaskField::Priority => None,
        }
    }

    fn focus(&mut self, field: TaskField) {
        self.field = field;
        self.cursor = self.buffer_mut(field).map_or(0, |b| b.len());
    }

    fn step(&mut self, forward: bool) {
        let i = TaskField::ALL
            .iter()
            .position(|f| *f == self.field)
            .unwrap_or_default();
        let n = TaskField::ALL.len();
        let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
        self.focus(TaskField::ALL[next]);
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> FormOutcome<TaskDraft> {
        match code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => {
                return match self.submit() {
                    Some(draft) => FormOutcome::Submitted(draft),
                    None => FormOutcome::Pending,
                };
            }
            KeyCode::Tab | KeyCode::Down => self.step(true),
            KeyCode::BackTab | KeyCode::Up => self.step(false),
            KeyCode::Left | KeyCode::Char('h') if self.field == TaskField::Priority => {
                self.priority = self.priority.prev();
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ')
                if self.field == TaskField::Priority =>
            {
                self.priority = self.priority.next();
            }
            _ => {
                let field = self.field;
                let mut cursor = self.cursor;
                if let Some(buf) = self.buffer_mut(field) {
                    apply_text_edit(buf, &mut cursor, code, modifiers);
                }
                self.cursor = cursor;
            }
        }
        FormOutcome::Pending
    }

    /// Validate and produce a draft. Refusals leave an inline error and keep
    /// the input. A create form resets itself afterwards; an edit form keeps
    /// its values.
    pub fn submit(&mut self) -> Option<TaskDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            self.error = Some("Title is required".to_string());
            self.focus(TaskField::Title);
            return None;
        }
        let due_date = match normalize_due_date(&self.due) {
            Ok(due) => due,
            Err(e) => {
                self.error = Some(e);
                self.focus(TaskField::Due);
                return None;
            }
        };

        let draft = TaskDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            priority: self.priority,
            status: self
                .editing
                .as_ref()
                .map(|t| t.status)
                .unwrap_or_default(),
            due_date,
            project_id: self.project_id.clone(),
        };

        if self.is_editing() {
            self.error = None;
        } else {
            *self = TaskForm::create(self.project_id.take());
        }
        Some(draft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Name,
    Color,
    Description,
}

impl ProjectField {
    pub const ALL: [ProjectField; 3] = [
        ProjectField::Name,
        ProjectField::Color,
        ProjectField::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectField::Name => "Name",
            ProjectField::Color => "Color",
            ProjectField::Description => "Description",
        }
    }
}

/// Create/edit form for a project.
#[derive(Debug, Clone)]
pub struct ProjectForm {
    pub editing: Option<Project>,
    pub field: ProjectField,
    pub name: String,
    pub color: String,
    pub description: String,
    pub cursor: usize,
    pub error: Option<String>,
}

impl Default for ProjectForm {
    fn default() -> Self {
        ProjectForm {
            editing: None,
            field: ProjectField::Name,
            name: String::new(),
            color: DEFAULT_PROJECT_COLOR.to_string(),
            description: String::new(),
            cursor: 0,
            error: None,
        }
    }
}

impl ProjectForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(project: &Project) -> Self {
        ProjectForm {
            editing: Some(project.clone()),
            name: project.name.clone(),
            color: project.color.clone(),
            description: project.description().to_string(),
            cursor: project.name.len(),
            ..Self::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn buffer_mut(&mut self, field: ProjectField) -> &mut String {
        match field {
            ProjectField::Name => &mut self.name,
            ProjectField::Color => &mut self.color,
            ProjectField::Description => &mut self.description,
        }
    }

    fn focus(&mut self, field: ProjectField) {
        self.field = field;
        self.cursor = self.buffer_mut(field).len();
    }

    fn step(&mut self, forward: bool) {
        let i = ProjectField::ALL
            .iter()
            .position(|f| *f == self.field)
            .unwrap_or_default();
        let n = ProjectField::ALL.len();
        let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
        self.focus(ProjectField::ALL[next]);
    }

    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> FormOutcome<ProjectDraft> {
        match code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => {
                return match self.submit() {
                    Some(draft) => FormOutcome::Submitted(draft),
                    None => FormOutcome::Pending,
                };
            }
            KeyCode::Tab | KeyCode::Down => self.step(true),
            KeyCode::BackTab | KeyCode::Up => self.step(false),
            _ => {
                let field = self.field;
                let mut cursor = self.cursor;
                apply_text_edit(self.buffer_mut(field), &mut cursor, code, modifiers);
                self.cursor = cursor;
            }
        }
        FormOutcome::Pending
    }

    /// Validate and produce a draft. The form resets after a successful
    /// create and keeps its values after an edit.
    pub fn submit(&mut self) -> Option<ProjectDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            self.error = Some("Name is required".to_string());
            self.focus(ProjectField::Name);
            return None;
        }
        let color = self.color.trim();
        if !is_hex_color(color) {
            self.error = Some(format!("'{color}' is not a #rrggbb colour"));
            self.focus(ProjectField::Color);
            return None;
        }

        let draft = ProjectDraft {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            color: color.to_lowercase(),
        };
        if self.is_editing() {
            self.error = None;
        } else {
            *self = ProjectForm::create();
        }
        Some(draft)
    }
}

/// Three-option picker for a task's status.
#[derive(Debug, Clone)]
pub struct StatusPicker {
    pub task: Task,
    pub index: usize,
}

impl StatusPicker {
    pub fn new(task: Task) -> Self {
        let index = task.status.index();
        StatusPicker { task, index }
    }

    pub fn selected(&self) -> TaskStatus {
        TaskStatus::ALL[self.index]
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormOutcome<TaskStatus> {
        match code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => return FormOutcome::Submitted(self.selected()),
            KeyCode::Up | KeyCode::Char('k') => self.index = self.index.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.index = (self.index + 1).min(TaskStatus::ALL.len() - 1);
            }
            KeyCode::Char(c @ '1'..='3') => {
                self.index = (c as usize) - ('1' as usize);
                return FormOutcome::Submitted(self.selected());
            }
            _ => {}
        }
        FormOutcome::Pending
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
