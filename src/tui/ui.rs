use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::api::Api;
use crate::store::{Column, Project, Task, TaskStatus};

use super::app::{App, Modal};
use super::form::{
    ProjectField, ProjectForm, StatusPicker, TaskField, TaskForm, format_with_cursor,
    measure_wrapped_height, render_hints, render_modal,
};
use super::view::Screen;

const LOADING_QUOTE: &str = "Generating inspiration...";

pub fn draw<A: Api>(frame: &mut Frame, app: &App<A>) {
    let show_banner =
        app.view.screen() != Screen::Home && (app.quote.is_some() || app.quote_loading());
    let banner_height = if show_banner {
        quote_text(app).map_or(0, |q| {
            measure_wrapped_height(&q, frame.area().width.saturating_sub(4)) + 2
        })
    } else {
        0
    };

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_tab_bar(frame, app, outer[0]);
    if show_banner {
        draw_quote(frame, app, outer[1], " Motivation ");
    }

    match app.view.screen() {
        Screen::Home => draw_home(frame, app, outer[2]),
        Screen::Tasks => draw_tasks(frame, app, outer[2]),
        Screen::Projects => draw_projects(frame, app, outer[2]),
        Screen::ProjectDetail => draw_project_detail(frame, app, outer[2]),
    }

    draw_status_bar(frame, app, outer[3]);

    match &app.modal {
        Modal::None => {}
        Modal::TaskForm(form) => draw_task_form(frame, app, form),
        Modal::ProjectForm(form) => draw_project_form(frame, app, form),
        Modal::StatusPicker(picker) => draw_status_picker(frame, app, picker),
        Modal::Help => draw_help(frame, app),
    }
}

fn quote_text<A: Api>(app: &App<A>) -> Option<String> {
    if app.quote_loading() {
        Some(LOADING_QUOTE.to_string())
    } else {
        app.quote.clone()
    }
}

// ── Chrome ────────────────────────────────────────────────────────────

fn draw_tab_bar<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let theme = &app.theme;
    let active = app.view.screen().tab_index();

    let mut spans = vec![Span::styled(
        " procrastinator ",
        Style::default()
            .fg(theme.accent_tertiary)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, screen) in Screen::TABS.iter().enumerate() {
        let style = if i == active {
            theme.tab_active_style()
        } else {
            theme.tab_inactive_style()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", i + 1, screen.title()), style));
    }
    if let Some(project) = app.view.selected_project() {
        spans.push(Span::styled(" › ", Style::default().fg(theme.text_secondary)));
        spans.push(Span::styled(
            project.name.as_str(),
            Style::default()
                .fg(theme.project_color(&project.color))
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_bar<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let theme = &app.theme;
    if let Some(toast) = &app.toast {
        let line = Line::from(Span::styled(
            format!(" {} ", toast.message),
            theme.toast_style(toast.style),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let hints: &[(&str, &str)] = match app.view.screen() {
        Screen::Home => &[
            (" n", ":new task  "),
            ("2", ":tasks  "),
            ("3", ":projects  "),
            ("?", ":help  "),
            ("q", ":quit"),
        ],
        Screen::Tasks => &[
            (" n", ":new  "),
            ("e", ":edit  "),
            ("d", ":delete  "),
            ("s", ":status  "),
            ("m", ":motivate  "),
            ("?", ":help"),
        ],
        Screen::Projects => &[
            (" Enter", ":open  "),
            ("n", ":new  "),
            ("e", ":edit  "),
            ("d", ":delete  "),
            ("?", ":help"),
        ],
        Screen::ProjectDetail => &[
            (" h/l", ":column  "),
            ("n", ":new task  "),
            ("s", ":status  "),
            ("m", ":motivate  "),
            ("x", ":delete project  "),
            ("Esc", ":back"),
        ],
    };
    render_hints(
        frame,
        area,
        hints,
        Style::default().fg(theme.text_accent),
        Style::default().fg(theme.text_secondary),
    );
}

fn draw_quote<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect, title: &str) {
    let theme = &app.theme;
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.quote));

    let paragraph = match quote_text(app) {
        Some(text) if app.quote_loading() => {
            Paragraph::new(Span::styled(text, Style::default().fg(theme.spinner)))
        }
        Some(text) => Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::ITALIC),
        )),
        None => Paragraph::new(Span::styled(
            "Pick a task and press m for a push in the right direction.",
            Style::default().fg(theme.text_secondary),
        )),
    };
    frame.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
}

// ── Home ──────────────────────────────────────────────────────────────

fn draw_home<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let quote_height = quote_text(app).map_or(1, |q| {
        measure_wrapped_height(&q, area.width.saturating_sub(2))
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(quote_height + 2),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_quote(frame, app, rows[0], " Daily Motivation ");
    draw_stat_cards(frame, app, rows[1]);

    let stats = &app.store.stats;
    let rate = stats.completion_rate();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Completion rate ")
                .borders(Borders::ALL)
                .border_style(app.theme.unfocused_border()),
        )
        .gauge_style(Style::default().fg(app.theme.completion_color(rate)))
        .ratio((rate / 100.0).clamp(0.0, 1.0))
        .label(format!("{rate:.1}%"));
    frame.render_widget(gauge, rows[2]);

    let theme = &app.theme;
    let actions = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Quick actions",
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("    n ", Style::default().fg(theme.text_accent)),
            Span::styled("add a task", Style::default().fg(theme.text_secondary)),
        ]),
        Line::from(vec![
            Span::styled("    2 ", Style::default().fg(theme.text_accent)),
            Span::styled(
                "work through loose tasks",
                Style::default().fg(theme.text_secondary),
            ),
        ]),
        Line::from(vec![
            Span::styled("    3 ", Style::default().fg(theme.text_accent)),
            Span::styled(
                "organise projects on a board",
                Style::default().fg(theme.text_secondary),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(actions), rows[3]);
}

fn draw_stat_cards<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let theme = &app.theme;
    let stats = &app.store.stats;
    let cards = [
        ("Total tasks", stats.total_tasks, theme.accent_primary),
        ("Completed", stats.completed_tasks, theme.status_completed),
        ("In progress", stats.in_progress_tasks, theme.status_in_progress),
        ("Projects", stats.total_projects, theme.accent_tertiary),
    ];
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value, color), col) in cards.into_iter().zip(cols.iter()) {
        let block = Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let text = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(ratatui::layout::Alignment::Center)
        .block(block);
        frame.render_widget(text, *col);
    }
}

// ── Tasks ─────────────────────────────────────────────────────────────

fn task_card<'a, A: Api>(app: &App<A>, task: &'a Task, selected: bool, width: u16) -> ListItem<'a> {
    let theme = &app.theme;
    let mut head = vec![
        if selected {
            Span::styled("▸ ", Style::default().fg(theme.selection_indicator))
        } else {
            Span::raw("  ")
        },
        Span::styled(
            format!("{} ", task.status.symbol()),
            theme.task_status_style(task.status),
        ),
    ];
    let title_style = if task.status == TaskStatus::Completed {
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        Style::default()
            .fg(theme.text_primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_primary)
    };
    head.push(Span::styled(task.title.as_str(), title_style));
    head.push(Span::raw(" "));
    head.push(Span::styled(
        format!("[{}]", task.priority.as_str().to_uppercase()),
        theme.priority_style(task.priority),
    ));
    if let Some(due) = task.due_label() {
        head.push(Span::styled(
            format!("  due {due}"),
            Style::default().fg(theme.text_secondary),
        ));
    }

    let mut lines = vec![Line::from(head)];
    let description = task.description();
    if !description.is_empty() {
        let max = usize::from(width.saturating_sub(6)).max(8);
        let text: String = if description.chars().count() > max {
            let cut: String = description.chars().take(max - 1).collect();
            format!("{cut}…")
        } else {
            description.to_string()
        };
        lines.push(Line::from(Span::styled(
            format!("    {text}"),
            Style::default().fg(theme.text_secondary),
        )));
    }
    ListItem::new(lines)
}

fn draw_tasks<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let theme = &app.theme;
    let tasks = app.task_list();
    let block = Block::default()
        .title(format!(" Tasks ({}) ", tasks.len()))
        .borders(Borders::ALL)
        .border_style(theme.focused_border());

    if tasks.is_empty() {
        let msg = Paragraph::new("  Nothing here yet. Press n to add a task.")
            .style(Style::default().fg(theme.text_secondary))
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| task_card(app, task, i == app.task_index, area.width))
        .collect();
    let mut state = ListState::default().with_selected(Some(app.task_index));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

// ── Projects ──────────────────────────────────────────────────────────

fn project_card<'a, A: Api>(app: &App<A>, project: &'a Project, selected: bool) -> ListItem<'a> {
    let theme = &app.theme;
    let counts = app.store.project_counts(&project.id);
    let name_style = if selected {
        Style::default()
            .fg(theme.text_primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_primary)
    };

    let mut lines = vec![Line::from(vec![
        if selected {
            Span::styled("▸ ", Style::default().fg(theme.selection_indicator))
        } else {
            Span::raw("  ")
        },
        Span::styled("● ", Style::default().fg(theme.project_color(&project.color))),
        Span::styled(project.name.as_str(), name_style),
    ])];
    if !project.description().is_empty() {
        lines.push(Line::from(Span::styled(
            format!("    {}", project.description()),
            Style::default().fg(theme.text_secondary),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("    {} tasks · {} completed", counts.total, counts.completed),
        Style::default().fg(theme.text_secondary),
    )));
    ListItem::new(lines)
}

fn draw_projects<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(format!(" Projects ({}) ", app.store.projects.len()))
        .borders(Borders::ALL)
        .border_style(theme.focused_border());

    if app.store.projects.is_empty() {
        let msg = Paragraph::new("  No projects yet. Press n to create one.")
            .style(Style::default().fg(theme.text_secondary))
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .store
        .projects
        .iter()
        .enumerate()
        .map(|(i, project)| project_card(app, project, i == app.project_index))
        .collect();
    let mut state = ListState::default().with_selected(Some(app.project_index));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

// ── Project board ─────────────────────────────────────────────────────

fn draw_project_detail<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let Some(project) = app.view.selected_project() else {
        return;
    };
    let theme = &app.theme;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let header = vec![
        Line::from(vec![
            Span::styled(" ● ", Style::default().fg(theme.project_color(&project.color))),
            Span::styled(
                project.name.as_str(),
                Style::default()
                    .fg(theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("   {}", project.description()),
            Style::default().fg(theme.text_secondary),
        )),
    ];
    frame.render_widget(Paragraph::new(header), rows[0]);

    let board = app.board();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[1]);
    for (i, (column, area)) in board.columns.iter().zip(cols.iter()).enumerate() {
        draw_column(frame, app, column, *area, i == app.column);
    }
}

fn draw_column<A: Api>(frame: &mut Frame, app: &App<A>, column: &Column<'_>, area: Rect, focused: bool) {
    let theme = &app.theme;
    let color = theme.task_status_color(column.status);
    let border = if focused {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        theme.unfocused_border()
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", column.title()), Style::default().fg(color)))
        .borders(Borders::ALL)
        .border_style(border);

    if column.tasks.is_empty() {
        let msg = Paragraph::new("  No tasks")
            .style(Style::default().fg(theme.text_secondary))
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = column
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| task_card(app, task, focused && i == app.row, area.width))
        .collect();
    // Only the focused column follows the cursor; the others stay at the top.
    let mut state = ListState::default().with_selected(focused.then_some(app.row));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

// ── Modals ────────────────────────────────────────────────────────────

fn field_line<'a>(
    label: &'a str,
    value: String,
    active: bool,
    highlight: Style,
    dim: Style,
) -> Line<'a> {
    let marker = if active { "▸ " } else { "  " };
    Line::from(vec![
        Span::styled(marker, highlight),
        Span::styled(format!("{label:<12}"), if active { highlight } else { dim }),
        Span::raw(value),
    ])
}

fn draw_task_form<A: Api>(frame: &mut Frame, app: &App<A>, form: &TaskForm) {
    let theme = &app.theme;
    let title = if form.is_editing() { " Edit Task " } else { " New Task " };
    let inner = render_modal(
        frame,
        title,
        Style::default().fg(theme.form_border_task),
        64,
        11,
    );
    let highlight = Style::default().fg(theme.form_highlight);
    let dim = Style::default().fg(theme.form_dim);

    let mut lines = Vec::new();
    for field in TaskField::ALL {
        let active = form.field == field;
        let raw = match field {
            TaskField::Title => form.title.as_str(),
            TaskField::Due => form.due.as_str(),
            TaskField::Description => form.description.as_str(),
            TaskField::Priority => "",
        };
        let value = match field {
            TaskField::Priority => format!("◂ {} ▸", form.priority.as_str()),
            _ if active => format_with_cursor(raw, form.cursor),
            TaskField::Due if raw.is_empty() => "YYYY-MM-DD HH:MM".to_string(),
            _ => raw.to_string(),
        };
        lines.push(field_line(field.label(), value, active, highlight, dim));
    }
    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(theme.form_error),
        )));
    }
    lines.push(Line::from(Span::styled(
        "  Tab: next field  ←/→: priority  Enter: save  Esc: cancel",
        dim,
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_project_form<A: Api>(frame: &mut Frame, app: &App<A>, form: &ProjectForm) {
    let theme = &app.theme;
    let title = if form.is_editing() { " Edit Project " } else { " New Project " };
    let inner = render_modal(
        frame,
        title,
        Style::default().fg(theme.form_border_project),
        64,
        10,
    );
    let highlight = Style::default().fg(theme.form_highlight);
    let dim = Style::default().fg(theme.form_dim);

    let mut lines = Vec::new();
    for field in ProjectField::ALL {
        let active = form.field == field;
        let raw = match field {
            ProjectField::Name => form.name.as_str(),
            ProjectField::Color => form.color.as_str(),
            ProjectField::Description => form.description.as_str(),
        };
        let value = if active {
            format_with_cursor(raw, form.cursor)
        } else {
            raw.to_string()
        };
        let mut line = field_line(field.label(), value, active, highlight, dim);
        if field == ProjectField::Color {
            line.spans.push(Span::styled(
                "  ●",
                Style::default().fg(theme.project_color(&form.color)),
            ));
        }
        lines.push(line);
    }
    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(theme.form_error),
        )));
    }
    lines.push(Line::from(Span::styled(
        "  Tab: next field  Enter: save  Esc: cancel",
        dim,
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_status_picker<A: Api>(frame: &mut Frame, app: &App<A>, picker: &StatusPicker) {
    let theme = &app.theme;
    let inner = render_modal(frame, " Status ", theme.focused_border(), 36, 7);

    let mut lines: Vec<Line> = TaskStatus::ALL
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let selected = i == picker.index;
            let mut style = theme.task_status_style(*status);
            if selected {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            Line::from(vec![
                Span::raw(if selected { "▸ " } else { "  " }),
                Span::styled(format!("{} {} {}", i + 1, status.symbol(), status.label()), style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Enter: set  Esc: cancel",
        Style::default().fg(theme.form_dim),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_help<A: Api>(frame: &mut Frame, app: &App<A>) {
    let theme = &app.theme;
    let sections = app.keymap.help_entries();
    let height = sections
        .iter()
        .map(|(_, entries)| entries.len() as u16 + 2)
        .sum::<u16>()
        + 3;
    let inner = render_modal(frame, " Help ", theme.focused_border(), 52, height);

    let mut lines = Vec::new();
    for (title, entries) in sections {
        lines.push(Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme.accent_secondary)
                .add_modifier(Modifier::BOLD),
        )));
        for entry in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", entry.label), Style::default().fg(theme.text_accent)),
                Span::styled(entry.description, Style::default().fg(theme.text_primary)),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.text_secondary),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}
