use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::api::Api;
use crate::config::Config;
use crate::store::{Board, Priority, Project, Refresh, Store, Task, TaskStatus};

use super::event::{self, AppEvent};
use super::form::{FormOutcome, ProjectForm, StatusPicker, TaskForm};
use super::keymap::{Action, KeyMap};
use super::theme::Theme;
use super::ui;
use super::view::{Effect, Screen, ViewState};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStyle {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub style: ToastStyle,
    shown_at: Instant,
}

/// Whatever is layered over the current screen and receiving keys.
#[derive(Debug, Clone)]
pub enum Modal {
    None,
    TaskForm(TaskForm),
    ProjectForm(ProjectForm),
    StatusPicker(StatusPicker),
    Help,
}

/// A quote request waiting for the next frame to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteJob {
    pub task_title: String,
    pub priority: Priority,
}

type ClipboardFn = Box<dyn FnMut(&str) -> Result<()>>;

pub struct App<A: Api> {
    pub store: Store<A>,
    pub view: ViewState,
    pub keymap: KeyMap,
    pub theme: Theme,
    pub modal: Modal,
    pub should_quit: bool,

    // Selection
    pub task_index: usize,
    pub project_index: usize,
    pub column: usize,
    pub row: usize,

    // Motivation
    pub quote: Option<String>,
    pub pending_quote: Option<QuoteJob>,
    quote_context: String,

    pub toast: Option<Toast>,
    clipboard: ClipboardFn,
}

impl<A: Api> App<A> {
    pub fn new(store: Store<A>, config: &Config) -> Self {
        App {
            store,
            view: ViewState::new(),
            keymap: KeyMap::default_keymap(),
            theme: config.theme.build(),
            modal: Modal::None,
            should_quit: false,
            task_index: 0,
            project_index: 0,
            column: 0,
            row: 0,
            quote: None,
            pending_quote: None,
            quote_context: config.quote.context.clone(),
            toast: None,
            clipboard: Box::new(system_clipboard),
        }
    }

    /// Replace the clipboard sink (the system clipboard by default).
    pub fn with_clipboard(mut self, clipboard: impl FnMut(&str) -> Result<()> + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(250);
        self.store.load();

        loop {
            if self.view.take_dirty() {
                terminal.draw(|frame| ui::draw(frame, self))?;
            }

            // Runs after the "Generating inspiration..." frame is on screen.
            if self.pending_quote.is_some() {
                self.resolve_pending_quote();
                continue;
            }

            match event::poll(tick_rate)? {
                AppEvent::Key(key) => self.handle_key(key),
                AppEvent::Resize => self.view.mark_dirty(),
                AppEvent::Tick => self.expire_toast(),
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.view.mark_dirty();
        match &mut self.modal {
            Modal::None => {
                if let Some(action) = self.keymap.lookup_normal(key.code, key.modifiers) {
                    self.dispatch(action);
                }
            }
            Modal::Help => self.modal = Modal::None,
            Modal::TaskForm(form) => match form.handle_key(key.code, key.modifiers) {
                FormOutcome::Pending => {}
                FormOutcome::Cancelled => self.modal = Modal::None,
                FormOutcome::Submitted(draft) => {
                    let editing = form.editing.take();
                    self.modal = Modal::None;
                    match editing {
                        Some(task) => {
                            if self.store.update_task(&draft.apply_to(&task)) {
                                self.notify("Task updated", ToastStyle::Success);
                            } else {
                                self.notify("Could not update task", ToastStyle::Error);
                            }
                        }
                        None => {
                            if self.store.create_task(&draft).is_some() {
                                self.notify("Task created", ToastStyle::Success);
                            } else {
                                self.notify("Could not create task", ToastStyle::Error);
                            }
                        }
                    }
                    self.clamp_selection();
                }
            },
            Modal::ProjectForm(form) => match form.handle_key(key.code, key.modifiers) {
                FormOutcome::Pending => {}
                FormOutcome::Cancelled => self.modal = Modal::None,
                FormOutcome::Submitted(draft) => {
                    let editing = form.editing.take();
                    self.modal = Modal::None;
                    match editing {
                        Some(project) => {
                            if self.store.update_project(&draft.apply_to(&project)) {
                                self.view.sync_selected(&self.store.projects);
                                self.notify("Project updated", ToastStyle::Success);
                            } else {
                                self.notify("Could not update project", ToastStyle::Error);
                            }
                        }
                        None => {
                            if self.store.create_project(&draft).is_some() {
                                self.notify("Project created", ToastStyle::Success);
                            } else {
                                self.notify("Could not create project", ToastStyle::Error);
                            }
                        }
                    }
                    self.clamp_selection();
                }
            },
            Modal::StatusPicker(picker) => match picker.handle_key(key.code) {
                FormOutcome::Pending => {}
                FormOutcome::Cancelled => self.modal = Modal::None,
                FormOutcome::Submitted(status) => {
                    let task = picker.task.clone();
                    self.modal = Modal::None;
                    self.change_status(&task, status);
                }
            },
        }
    }

    fn dispatch(&mut self, action: Action) {
        let screen = self.view.screen();
        match action {
            Action::Quit => self.should_quit = true,
            Action::ShowHelp => self.modal = Modal::Help,
            Action::GoHome => self.navigate(Screen::Home),
            Action::GoTasks => self.navigate(Screen::Tasks),
            Action::GoProjects => self.navigate(Screen::Projects),
            Action::NextTab | Action::PrevTab => {
                let n = Screen::TABS.len();
                let i = screen.tab_index();
                let next = if action == Action::NextTab {
                    (i + 1) % n
                } else {
                    (i + n - 1) % n
                };
                self.navigate(Screen::TABS[next]);
            }
            Action::Refresh => {
                self.store.refresh(Refresh::ALL);
                self.view.sync_selected(&self.store.projects);
                self.clamp_selection();
            }
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            Action::MoveLeft if screen == Screen::ProjectDetail => {
                self.column = self.column.saturating_sub(1);
                self.row = 0;
            }
            Action::MoveRight if screen == Screen::ProjectDetail => {
                self.column = (self.column + 1).min(TaskStatus::ALL.len() - 1);
                self.row = 0;
            }
            Action::Select if screen == Screen::Projects => {
                if let Some(project) = self.selected_project_card().cloned() {
                    let effect = self.view.open_project(project);
                    self.column = 0;
                    self.row = 0;
                    self.apply(effect);
                }
            }
            Action::Back => {
                let effect = self.view.back_to_projects();
                self.apply(effect);
            }
            Action::NewItem => match screen {
                Screen::Projects => self.modal = Modal::ProjectForm(ProjectForm::create()),
                _ => {
                    let scope = self.view.scope().map(str::to_string);
                    self.modal = Modal::TaskForm(TaskForm::create(scope));
                }
            },
            Action::Edit => {
                if screen == Screen::Projects {
                    if let Some(project) = self.selected_project_card() {
                        self.modal = Modal::ProjectForm(ProjectForm::edit(project));
                    }
                } else if let Some(task) = self.selected_task() {
                    self.modal = Modal::TaskForm(TaskForm::edit(task, self.view.scope()));
                }
            }
            Action::Delete => {
                if screen == Screen::Projects {
                    if let Some(id) = self.selected_project_card().map(|p| p.id.clone()) {
                        self.delete_project(&id);
                    }
                } else if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
                    if self.store.delete_task(&id) {
                        self.notify("Task deleted", ToastStyle::Success);
                    } else {
                        self.notify("Could not delete task", ToastStyle::Error);
                    }
                    self.clamp_selection();
                }
            }
            Action::ChangeStatus => {
                if let Some(task) = self.selected_task() {
                    self.modal = Modal::StatusPicker(StatusPicker::new(task.clone()));
                }
            }
            Action::Motivate => {
                if let Some((title, priority)) =
                    self.selected_task().map(|t| (t.title.clone(), t.priority))
                {
                    self.request_quote(&title, priority);
                }
            }
            Action::CopyQuote => self.copy_quote(),
            Action::DeleteProject => {
                if let Some(id) = self.view.scope().map(str::to_string) {
                    self.delete_project(&id);
                }
            }
            Action::MoveLeft | Action::MoveRight | Action::Select => {}
        }
    }

    fn navigate(&mut self, screen: Screen) {
        let effect = self.view.navigate(screen);
        self.apply(effect);
    }

    /// Carry out the data work a view transition asked for.
    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::FetchTasks(scope) => {
                if !self.store.fetch_tasks(scope.as_deref()) {
                    self.notify("Could not load tasks", ToastStyle::Error);
                }
            }
        }
        self.clamp_selection();
    }

    /// The view leaves the project first, whether or not the delete goes through.
    fn delete_project(&mut self, id: &str) {
        let effect = self.view.project_deleted(id);
        self.apply(effect);
        if self.store.delete_project(id) {
            self.notify("Project deleted", ToastStyle::Success);
        } else {
            self.notify("Could not delete project", ToastStyle::Error);
        }
        self.clamp_selection();
    }

    fn change_status(&mut self, task: &Task, status: TaskStatus) {
        if task.status == status {
            return;
        }
        if self.store.set_task_status(task, status) {
            self.notify(format!("Moved to {}", status.label()), ToastStyle::Success);
        } else {
            self.notify("Could not update task", ToastStyle::Error);
        }
        self.clamp_selection();
    }

    // ── Motivation ──

    /// Queue a quote request; it is sent once the loading frame is drawn.
    pub fn request_quote(&mut self, task_title: &str, priority: Priority) {
        self.pending_quote = Some(QuoteJob {
            task_title: task_title.to_string(),
            priority,
        });
        self.view.mark_dirty();
    }

    pub fn quote_loading(&self) -> bool {
        self.pending_quote.is_some()
    }

    pub fn resolve_pending_quote(&mut self) {
        if let Some(job) = self.pending_quote.take() {
            let quote =
                self.store
                    .motivational_quote(&job.task_title, job.priority, &self.quote_context);
            self.quote = Some(quote);
            self.view.mark_dirty();
        }
    }

    fn copy_quote(&mut self) {
        let Some(quote) = self.quote.clone() else {
            self.notify("No quote to copy yet", ToastStyle::Info);
            return;
        };
        match (self.clipboard)(&quote) {
            Ok(()) => self.notify("Quote copied", ToastStyle::Success),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                self.notify("Could not copy quote", ToastStyle::Error);
            }
        }
    }

    // ── Toasts ──

    fn notify(&mut self, message: impl Into<String>, style: ToastStyle) {
        self.toast = Some(Toast {
            message: message.into(),
            style,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
            self.view.mark_dirty();
        }
    }

    // ── Selection ──

    /// Tasks listed on the Tasks screen.
    pub fn task_list(&self) -> Vec<&Task> {
        self.store.unassigned_tasks()
    }

    /// The open project's board.
    pub fn board(&self) -> Board<'_> {
        match self.view.scope() {
            Some(id) => Board::partition(self.store.project_tasks(id)),
            None => Board::partition(std::iter::empty()),
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        match self.view.screen() {
            Screen::Tasks => self.task_list().get(self.task_index).copied(),
            Screen::ProjectDetail => {
                let board = self.board();
                board.columns[self.column].tasks.get(self.row).copied()
            }
            Screen::Home | Screen::Projects => None,
        }
    }

    pub fn selected_project_card(&self) -> Option<&Project> {
        self.store.projects.get(self.project_index)
    }

    fn selection_len(&self) -> usize {
        match self.view.screen() {
            Screen::Tasks => self.task_list().len(),
            Screen::Projects => self.store.projects.len(),
            Screen::ProjectDetail => self.board().columns[self.column].tasks.len(),
            Screen::Home => 0,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.view.screen() {
            Screen::Tasks => Some(&mut self.task_index),
            Screen::Projects => Some(&mut self.project_index),
            Screen::ProjectDetail => Some(&mut self.row),
            Screen::Home => None,
        }
    }

    fn move_down(&mut self) {
        let len = self.selection_len();
        if let Some(index) = self.selection_mut()
            && len > 0
        {
            *index = (*index + 1).min(len - 1);
        }
    }

    fn move_up(&mut self) {
        if let Some(index) = self.selection_mut() {
            *index = index.saturating_sub(1);
        }
    }

    fn clamp_selection(&mut self) {
        let tasks = self.task_list().len();
        self.task_index = self.task_index.min(tasks.saturating_sub(1));
        let projects = self.store.projects.len();
        self.project_index = self.project_index.min(projects.saturating_sub(1));
        let cards = self.board().columns[self.column].tasks.len();
        self.row = self.row.min(cards.saturating_sub(1));
    }
}

fn system_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}
