use chrono::{DateTime, Local, NaiveDate, Utc};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::task::{Priority, Task};

use super::app::{AppState, DeleteConfirmState, StatusKind, ViewMode};
use super::editor::{CategoryPicker, EditorField, EditorKind, EditorState, PriorityPicker};

const PRIORITY_WIDTH: usize = 6;
const DATE_WIDTH: usize = 10;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER: Color = Color::Rgb(92, 126, 166);

/// Priority badge color. Exhaustive on purpose: a new priority variant has
/// to pick a color here before the crate compiles.
fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Rgb(255, 87, 87),
        Priority::Medium => COLOR_WARNING,
        Priority::Low => COLOR_ACCENT,
    }
}

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);
    let header = chunks[0];
    let main = chunks[1];
    let footer = chunks[2];

    render_header(frame, app, header);

    match app.view {
        ViewMode::List => render_list(frame, app, main),
        ViewMode::Detail => render_detail(frame, app, main),
        ViewMode::Create | ViewMode::Edit => render_editor(frame, app, main),
    }

    render_footer(frame, app, footer);

    if let Some(picker) = app.editor_priority_picker.as_ref() {
        render_priority_modal(frame, area, picker);
    }
    if let Some(picker) = app.category_picker.as_ref() {
        render_category_modal(frame, area, picker);
    }
    if let Some(state) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, state);
    }
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![Span::styled(
        "Tasks",
        Style::default()
            .fg(COLOR_INFO)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )];
    let view_label = match app.view {
        ViewMode::List => None,
        ViewMode::Create => Some("new task"),
        ViewMode::Detail => Some("details"),
        ViewMode::Edit => Some("edit task"),
    };
    if let Some(label) = view_label {
        spans.push(Span::styled(
            format!("  {label}"),
            Style::default().fg(COLOR_MUTED),
        ));
    }
    if app.loading {
        spans.push(Span::styled(
            "  loading...",
            Style::default().fg(COLOR_WARNING),
        ));
    }
    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_list(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let mut lines = Vec::new();
    let content_width = area.width.saturating_sub(2) as usize;

    let filters_visible = app.search_active
        || !app.search.is_empty()
        || app.priority_filter.is_some()
        || app.category_filter.is_some();
    if filters_visible {
        let search_label = if app.search_active && app.search.is_empty() {
            "search: _".to_string()
        } else if app.search.is_empty() {
            "search:".to_string()
        } else {
            format!("search: {}", app.search)
        };
        let priority_label = match app.priority_filter {
            Some(priority) => format!("priority: {priority}"),
            None => "priority: all".to_string(),
        };
        let category_label = match app.category_filter.as_deref() {
            Some(value) => format!("category: {value}"),
            None => "category: all".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(search_label, Style::default().fg(COLOR_INFO)),
            Span::raw("  "),
            Span::styled(priority_label, Style::default().fg(COLOR_WARNING)),
            Span::raw("  "),
            Span::styled(category_label, Style::default().fg(COLOR_SUCCESS)),
        ]));
        lines.push(Line::from(""));
    }

    if app.filtered.is_empty() {
        if app.tasks.is_empty() {
            lines.push(Line::from(if app.loading {
                "Loading tasks..."
            } else {
                "No tasks. Press n to create your first one."
            }));
        } else {
            lines.push(Line::from("No matches"));
        }
    } else {
        let list_height = area
            .height
            .saturating_sub(2)
            .saturating_sub(lines.len() as u16) as usize;
        let selected_pos = app
            .selected
            .and_then(|idx| app.filtered.iter().position(|candidate| *candidate == idx));
        let (start, end) = list_window(app.filtered.len(), selected_pos, list_height);
        for pos in start..end {
            let idx = app.filtered[pos];
            if let Some(task) = app.tasks.get(idx) {
                let selected = app.selected == Some(idx);
                lines.push(render_list_row(task, selected, content_width));
            }
        }
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Tasks")
                .border_style(Style::default().fg(COLOR_BORDER)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_list_row(task: &Task, selected: bool, width: usize) -> Line<'static> {
    let marker = if task.completed { "[x]" } else { "[ ]" };
    let marker_style = if task.completed {
        Style::default().fg(COLOR_SUCCESS)
    } else {
        Style::default().fg(COLOR_MUTED_DARK)
    };
    let date_text = pad_text(&task.due_date.to_string(), DATE_WIDTH);
    let priority_text = pad_text(task.priority.label(), PRIORITY_WIDTH);
    let category = task.category.trim();
    let category_width = if category.is_empty() {
        0
    } else {
        category.chars().count().min(16) + 3
    };
    let used = 3 + DATE_WIDTH + PRIORITY_WIDTH + 4 + category_width;
    let title_width = width.saturating_sub(used);
    let title_style = if task.completed {
        Style::default()
            .fg(COLOR_MUTED_DARK)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(marker.to_string(), marker_style),
        Span::raw(" "),
        Span::styled(date_text, due_date_style(task)),
        Span::raw(" "),
        Span::styled(
            priority_text,
            Style::default()
                .fg(priority_color(task.priority))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(truncate_text(&task.title, title_width), title_style),
    ];
    if !category.is_empty() {
        spans.push(Span::styled(
            format!("  ({})", truncate_text(category, 16)),
            Style::default().fg(COLOR_MUTED),
        ));
    }

    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }

    Line::from(spans)
}

fn due_date_style(task: &Task) -> Style {
    if !task.completed && task.due_date < today() {
        Style::default().fg(COLOR_ERROR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_WARNING)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn render_detail(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let lines = build_detail_lines(app, content_width);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Details")
                .border_style(Style::default().fg(COLOR_BORDER)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn build_detail_lines(app: &AppState, width: usize) -> Vec<Line<'static>> {
    let Some(task) = app.selected_task() else {
        return vec![Line::from("No task selected")];
    };

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            if task.completed { "[x] " } else { "[ ] " },
            Style::default().fg(COLOR_SUCCESS),
        ),
        Span::styled(
            task.title.clone(),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        label_span("Priority: "),
        Span::styled(
            task.priority.label().to_string(),
            Style::default()
                .fg(priority_color(task.priority))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        label_span("Due: "),
        Span::styled(task.due_date.to_string(), due_date_style(task)),
    ]));
    if !task.category.trim().is_empty() {
        lines.push(Line::from(vec![
            label_span("Category: "),
            Span::styled(task.category.clone(), Style::default().fg(COLOR_SUCCESS)),
        ]));
    }
    let mut stamp_spans = vec![
        label_span("Created: "),
        Span::styled(
            format_timestamp(task.created_at),
            Style::default().fg(COLOR_WARNING),
        ),
    ];
    if let Some(updated) = task.updated_at {
        stamp_spans.push(Span::raw("  "));
        stamp_spans.push(label_span("Updated: "));
        stamp_spans.push(Span::styled(
            format_timestamp(updated),
            Style::default().fg(COLOR_WARNING),
        ));
    }
    lines.push(Line::from(stamp_spans));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Description".to_string(),
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    let description = task.description.trim_end();
    if description.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "No description.",
            Style::default().fg(COLOR_MUTED_DARK),
        )));
    } else {
        for line in description.lines() {
            lines.push(Line::from(Span::styled(
                truncate_text(line, width),
                Style::default().fg(COLOR_TEXT),
            )));
        }
    }

    lines
}

fn render_editor(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let Some(editor) = app.editor.as_ref() else {
        return;
    };
    let title = match editor.kind() {
        EditorKind::NewTask => "New Task",
        EditorKind::EditTask => "Edit Task",
    };
    let lines = if editor.confirming() {
        build_confirm_lines(editor, content_width)
    } else {
        build_editor_lines(editor, content_width)
    };
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(COLOR_BORDER)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn build_editor_lines(editor: &EditorState, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, field) in editor.fields().iter().enumerate() {
        let is_active = idx == editor.active_index();
        lines.push(editor_field_line(field, is_active, width));
    }

    if let Some(error) = editor.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines
}

fn editor_field_line(field: &EditorField, is_active: bool, width: usize) -> Line<'static> {
    let label = format!("{:<12}", field.label);
    let mut value = field.value.replace('\n', " ");
    let placeholder = if value.trim().is_empty() {
        if field.required {
            Some("<required>".to_string())
        } else {
            Some("(optional)".to_string())
        }
    } else {
        None
    };
    let value_style = if placeholder.is_some() {
        Style::default().fg(COLOR_MUTED)
    } else {
        Style::default().fg(COLOR_TEXT)
    };
    if let Some(place) = placeholder {
        value = place;
    }
    let mut spans = vec![
        Span::styled(label, Style::default().fg(COLOR_TEXT)),
        Span::raw(" "),
        Span::styled(truncate_text(&value, width.saturating_sub(14)), value_style),
    ];
    if is_active {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    Line::from(spans)
}

fn build_confirm_lines(editor: &EditorState, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(Span::styled(
        "Confirm task details",
        Style::default()
            .fg(COLOR_WARNING)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    if let Ok(submit) = editor.build_submit() {
        lines.push(Line::from(vec![
            label_span("Title: "),
            Span::styled(
                truncate_text(&submit.title, width.saturating_sub(8)),
                Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            label_span("Due: "),
            Span::styled(
                submit.due_date.to_string(),
                Style::default().fg(COLOR_WARNING),
            ),
            Span::raw("  "),
            label_span("Priority: "),
            Span::styled(
                submit.priority.label().to_string(),
                Style::default().fg(priority_color(submit.priority)),
            ),
        ]));
        if submit.category.is_empty() {
            lines.push(Line::from(vec![
                label_span("Category: "),
                Span::styled("(none)".to_string(), Style::default().fg(COLOR_MUTED_DARK)),
            ]));
        } else {
            lines.push(Line::from(vec![
                label_span("Category: "),
                Span::styled(submit.category.clone(), Style::default().fg(COLOR_SUCCESS)),
            ]));
        }
        if submit.description.trim().is_empty() {
            lines.push(Line::from(vec![
                label_span("Description: "),
                Span::styled("(none)".to_string(), Style::default().fg(COLOR_MUTED_DARK)),
            ]));
        } else {
            let preview = submit.description.replace('\n', " ");
            lines.push(Line::from(vec![
                label_span("Description: "),
                Span::styled(
                    truncate_text(&preview, width.saturating_sub(14)),
                    Style::default().fg(COLOR_TEXT),
                ),
            ]));
        }
    }

    if let Some(error) = editor.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter save  esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));
    lines
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = app.footer_hint();
    let hint_span = Span::styled(hint, Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.task_count_summary(),
        Style::default().fg(COLOR_ACCENT),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER)),
        );
    frame.render_widget(widget, area);
}

fn render_priority_modal(frame: &mut Frame, area: Rect, picker: &PriorityPicker) {
    let content_width = 22u16.min(area.width.saturating_sub(6));
    let height = (picker.options().len() as u16 + 4).min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, option) in picker.options().iter().enumerate() {
        let mut span = Span::styled(
            option.label().to_string(),
            Style::default()
                .fg(priority_color(*option))
                .add_modifier(Modifier::BOLD),
        );
        if idx == picker.selected_index() {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(span));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter apply  esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Priority"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_category_modal(frame: &mut Frame, area: Rect, picker: &CategoryPicker) {
    let content_width = 32u16.min(area.width.saturating_sub(6));
    let height = (picker.options().len() as u16 + 4).min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, option) in picker.options().iter().enumerate() {
        let (text, style) = match option {
            None => (
                "all".to_string(),
                Style::default().fg(COLOR_INFO).add_modifier(Modifier::BOLD),
            ),
            Some(category) => (
                category.clone(),
                Style::default().fg(COLOR_SUCCESS).add_modifier(Modifier::BOLD),
            ),
        };
        let mut span = Span::styled(text, style);
        if idx == picker.selected_index() {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(span));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter apply  esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Category Filter"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_delete_confirm_modal(frame: &mut Frame, area: Rect, state: &DeleteConfirmState) {
    let content_width = area.width.saturating_sub(8).min(64);
    let height = 9u16.min(area.height.saturating_sub(6).max(8));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let title_width = (content_width as usize).saturating_sub(8);
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(Span::styled(
        "Delete task?",
        Style::default()
            .fg(COLOR_ERROR)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    if !state.title.trim().is_empty() {
        lines.push(Line::from(vec![
            label_span("Title: "),
            Span::styled(
                truncate_text(&state.title, title_width),
                Style::default().fg(COLOR_TEXT),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "This cannot be undone.",
        Style::default().fg(COLOR_WARNING),
    )));
    lines.push(Line::from(""));
    if state.pending.is_some() {
        lines.push(Line::from(Span::styled(
            "deleting...",
            Style::default().fg(COLOR_WARNING),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "y/enter confirm  esc cancel",
            Style::default().fg(COLOR_MUTED_DARK),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Delete Task"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn pad_text(value: &str, width: usize) -> String {
    let mut text = value.to_string();
    if text.len() > width {
        text = truncate_text(&text, width);
    }
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

fn label_span(label: &str) -> Span<'static> {
    Span::styled(label.to_string(), Style::default().fg(COLOR_MUTED_DARK))
}
