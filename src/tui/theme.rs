use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::store::{Priority, TaskStatus};

use super::app::ToastStyle;

/// Semantic colour theme for the entire TUI.
///
/// Every colour used by the renderer is stored here so the user can
/// override any of them via `[theme]` in `config.toml`.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Borders ───────────────────────────────────────────────
    pub border_focused: Color,
    pub border_unfocused: Color,

    // ── Text ──────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_accent: Color,

    // ── Task status ───────────────────────────────────────────
    pub status_todo: Color,
    pub status_in_progress: Color,
    pub status_completed: Color,

    // ── Priority badges ───────────────────────────────────────
    pub priority_low: Color,
    pub priority_medium: Color,
    pub priority_high: Color,

    // ── Accents ───────────────────────────────────────────────
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub accent_tertiary: Color,
    pub quote: Color,

    // ── Toast ─────────────────────────────────────────────────
    pub toast_info: Color,
    pub toast_success: Color,
    pub toast_error: Color,

    // ── Completion rate ───────────────────────────────────────
    pub rate_low: Color,
    pub rate_medium: Color,
    pub rate_high: Color,

    // ── Forms ─────────────────────────────────────────────────
    pub form_border_task: Color,
    pub form_border_project: Color,
    pub form_highlight: Color,
    pub form_dim: Color,
    pub form_error: Color,

    // ── Tabs ──────────────────────────────────────────────────
    pub tab_active: Color,
    pub tab_inactive: Color,

    // ── Misc ──────────────────────────────────────────────────
    pub selection_indicator: Color,
    pub spinner: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_focused: Color::Cyan,
            border_unfocused: Color::DarkGray,

            text_primary: Color::White,
            text_secondary: Color::DarkGray,
            text_accent: Color::Cyan,

            status_todo: Color::Gray,
            status_in_progress: Color::Blue,
            status_completed: Color::Green,

            priority_low: Color::Green,
            priority_medium: Color::Yellow,
            priority_high: Color::Red,

            accent_primary: Color::Cyan,
            accent_secondary: Color::Yellow,
            accent_tertiary: Color::Magenta,
            quote: Color::Rgb(168, 85, 247),

            toast_info: Color::Cyan,
            toast_success: Color::Green,
            toast_error: Color::Red,

            rate_low: Color::Red,
            rate_medium: Color::Yellow,
            rate_high: Color::Green,

            form_border_task: Color::Yellow,
            form_border_project: Color::Magenta,
            form_highlight: Color::Yellow,
            form_dim: Color::DarkGray,
            form_error: Color::LightRed,

            tab_active: Color::Cyan,
            tab_inactive: Color::DarkGray,

            selection_indicator: Color::Cyan,
            spinner: Color::Yellow,
        }
    }
}

impl Theme {
    /// Style for a focused panel border.
    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    /// Style for an unfocused panel border.
    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.border_unfocused)
    }

    pub fn task_status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Todo => self.status_todo,
            TaskStatus::InProgress => self.status_in_progress,
            TaskStatus::Completed => self.status_completed,
        }
    }

    /// Map a `TaskStatus` to its display style (foreground colour).
    pub fn task_status_style(&self, status: TaskStatus) -> Style {
        Style::default().fg(self.task_status_color(status))
    }

    /// Bold badge style for a priority.
    pub fn priority_style(&self, priority: Priority) -> Style {
        let color = match priority {
            Priority::Low => self.priority_low,
            Priority::Medium => self.priority_medium,
            Priority::High => self.priority_high,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Style for the active tab label.
    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.tab_active)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Style for an inactive tab label.
    pub fn tab_inactive_style(&self) -> Style {
        Style::default().fg(self.tab_inactive)
    }

    /// Style for a toast notification.
    pub fn toast_style(&self, style: ToastStyle) -> Style {
        let color = match style {
            ToastStyle::Info => self.toast_info,
            ToastStyle::Success => self.toast_success,
            ToastStyle::Error => self.toast_error,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Colour for a completion-rate gauge at the given percentage.
    pub fn completion_color(&self, pct: f64) -> Color {
        if pct >= 70.0 {
            self.rate_high
        } else if pct >= 30.0 {
            self.rate_medium
        } else {
            self.rate_low
        }
    }

    /// A project's own colour, or the primary accent if it doesn't parse.
    pub fn project_color(&self, hex: &str) -> Color {
        parse_color(hex).unwrap_or(self.accent_primary)
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// All-optional mirror of [`Theme`] for `config.toml` `[theme]` section.
///
/// Only `Some` fields override the default; everything else keeps its default.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeConfig {
    pub border_focused: Option<String>,
    pub border_unfocused: Option<String>,

    pub text_primary: Option<String>,
    pub text_secondary: Option<String>,
    pub text_accent: Option<String>,

    pub status_todo: Option<String>,
    pub status_in_progress: Option<String>,
    pub status_completed: Option<String>,

    pub priority_low: Option<String>,
    pub priority_medium: Option<String>,
    pub priority_high: Option<String>,

    pub accent_primary: Option<String>,
    pub accent_secondary: Option<String>,
    pub accent_tertiary: Option<String>,
    pub quote: Option<String>,

    pub toast_info: Option<String>,
    pub toast_success: Option<String>,
    pub toast_error: Option<String>,

    pub rate_low: Option<String>,
    pub rate_medium: Option<String>,
    pub rate_high: Option<String>,

    pub form_border_task: Option<String>,
    pub form_border_project: Option<String>,
    pub form_highlight: Option<String>,
    pub form_dim: Option<String>,
    pub form_error: Option<String>,

    pub tab_active: Option<String>,
    pub tab_inactive: Option<String>,

    pub selection_indicator: Option<String>,
    pub spinner: Option<String>,
}

/// Parse a colour string into a ratatui `Color`.
///
/// Supports named colours (`"cyan"`, `"red"`, `"dark_gray"`, etc.),
/// `"rgb(R,G,B)"` and `"#rrggbb"`.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }

    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            return Some(Color::Rgb(r, g, b));
        }
        return None;
    }

    // Named colours (case-insensitive, with underscore tolerance)
    let lower = s.to_lowercase().replace('-', "_");
    match lower.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

fn apply(target: &mut Color, source: Option<&String>) {
    if let Some(s) = source
        && let Some(color) = parse_color(s)
    {
        *target = color;
    }
}

impl ThemeConfig {
    /// Build a `Theme` starting from defaults, overriding any fields that were
    /// set in the config file. Unparseable values are ignored.
    pub fn build(&self) -> Theme {
        let mut t = Theme::default();

        apply(&mut t.border_focused, self.border_focused.as_ref());
        apply(&mut t.border_unfocused, self.border_unfocused.as_ref());
        apply(&mut t.text_primary, self.text_primary.as_ref());
        apply(&mut t.text_secondary, self.text_secondary.as_ref());
        apply(&mut t.text_accent, self.text_accent.as_ref());
        apply(&mut t.status_todo, self.status_todo.as_ref());
        apply(&mut t.status_in_progress, self.status_in_progress.as_ref());
        apply(&mut t.status_completed, self.status_completed.as_ref());
        apply(&mut t.priority_low, self.priority_low.as_ref());
        apply(&mut t.priority_medium, self.priority_medium.as_ref());
        apply(&mut t.priority_high, self.priority_high.as_ref());
        apply(&mut t.accent_primary, self.accent_primary.as_ref());
        apply(&mut t.accent_secondary, self.accent_secondary.as_ref());
        apply(&mut t.accent_tertiary, self.accent_tertiary.as_ref());
        apply(&mut t.quote, self.quote.as_ref());
        apply(&mut t.toast_info, self.toast_info.as_ref());
        apply(&mut t.toast_success, self.toast_success.as_ref());
        apply(&mut t.toast_error, self.toast_error.as_ref());
        apply(&mut t.rate_low, self.rate_low.as_ref());
        apply(&mut t.rate_medium, self.rate_medium.as_ref());
        apply(&mut t.rate_high, self.rate_high.as_ref());
        apply(&mut t.form_border_task, self.form_border_task.as_ref());
        apply(
            &mut t.form_border_project,
            self.form_border_project.as_ref(),
        );
        apply(&mut t.form_highlight, self.form_highlight.as_ref());
        apply(&mut t.form_dim, self.form_dim.as_ref());
        apply(&mut t.form_error, self.form_error.as_ref());
        apply(&mut t.tab_active, self.tab_active.as_ref());
        apply(&mut t.tab_inactive, self.tab_inactive.as_ref());
        apply(
            &mut t.selection_indicator,
            self.selection_indicator.as_ref(),
        );
        apply(&mut t.spinner, self.spinner.as_ref());

        t
    }
}
