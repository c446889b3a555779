//! Preview screen: fill in the form as an end user would

use super::theme::Palette;
use super::widgets::draw_input;
use crate::app::App;
use crate::state::{Field, FieldType, FieldValue, Form, PreviewSession};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Rows used by one field: input box plus an error/help line
const FIELD_HEIGHT: u16 = 4;

/// Narrow `area` to the width of the active preview viewport
fn viewport(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(form) = app.store.form() else {
        frame.render_widget(Paragraph::new("No form open"), area);
        return;
    };
    let state = app.store.state();
    let area = viewport(area, state.preview_mode.max_width());
    let session = &app.state.preview;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .title(format!(" {} · {} ", form.title, state.preview_mode.label()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if session.is_submitted() {
        let lines = vec![
            Line::from(Span::styled(
                "Thank You!",
                Style::default()
                    .fg(palette.success)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Your form has been submitted successfully."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to submit another response",
                Style::default().fg(palette.muted),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Description
            Constraint::Length(2), // Progress
            Constraint::Min(0),    // Fields
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(form.description.clone().unwrap_or_default())
            .style(Style::default().fg(palette.muted))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    draw_progress(frame, chunks[1], form, session, palette);

    if let Some(step) = session.step(form) {
        let fields_area = chunks[2];
        let visible = (fields_area.height / FIELD_HEIGHT).max(1) as usize;
        let first = session.focus().saturating_sub(visible - 1);
        for (row, (index, field)) in step.fields.iter().enumerate().skip(first).enumerate() {
            let y = fields_area.y + row as u16 * FIELD_HEIGHT;
            if y + FIELD_HEIGHT > fields_area.y + fields_area.height {
                break;
            }
            let slot = Rect::new(fields_area.x, y, fields_area.width, FIELD_HEIGHT);
            draw_field(frame, slot, field, session, index == session.focus(), palette);
        }
    }

    let action = if session.is_last_step(form) { "[Enter] Submit" } else { "[Enter] Next" };
    let mut buttons = Vec::new();
    if session.step_index() > 0 {
        buttons.push(Span::styled("[←] Previous   ", Style::default().fg(palette.fg)));
    }
    buttons.push(Span::styled(action, palette.selected()));
    frame.render_widget(Paragraph::new(Line::from(buttons)), chunks[3]);
}

fn draw_progress(frame: &mut Frame, area: Rect, form: &Form, session: &PreviewSession, palette: &Palette) {
    if form.steps.len() < 2 {
        return;
    }
    let step = session.step_index();
    let title = session.step(form).map(|s| s.title.as_str()).unwrap_or("");
    let ratio = (step + 1) as f64 / form.steps.len() as f64;
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(palette.accent))
            .label(format!("Step {} of {}: {title}", step + 1, form.steps.len()))
            .ratio(ratio),
        Rect { height: 1, ..area },
    );
}

fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &Field,
    session: &PreviewSession,
    is_active: bool,
    palette: &Palette,
) {
    let label = if field.is_required() {
        format!("{} *", field.label)
    } else {
        field.label.clone()
    };
    let input_area = Rect { height: 3, ..area };
    let note_area = Rect {
        y: area.y + 3,
        height: 1,
        ..area
    };

    match field.field_type {
        FieldType::Dropdown | FieldType::Radio | FieldType::Checkbox => {
            let value = session.value(field);
            let chosen = |v: &str| match &value {
                FieldValue::List(items) => items.iter().any(|i| i == v),
                FieldValue::Text(s) => s == v,
                _ => false,
            };
            let spans: Vec<Span> = field
                .options()
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    let mark = match (field.field_type, chosen(&option.value)) {
                        (FieldType::Checkbox, true) => "[x]",
                        (FieldType::Checkbox, false) => "[ ]",
                        (_, true) => "(•)",
                        (_, false) => "( )",
                    };
                    Span::raw(format!("{}{mark} {}  ", i + 1, option.label))
                })
                .collect();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(is_active))
                .title(format!(" {label} "));
            frame.render_widget(Paragraph::new(Line::from(spans)).block(block), input_area);
        }
        _ => {
            let text = session.input_text(field);
            draw_input(
                frame,
                input_area,
                &label,
                &text,
                field.placeholder.as_deref(),
                is_active,
                palette,
            );
        }
    }

    let note = match session.error(&field.id) {
        Some(error) => Span::styled(error.to_string(), Style::default().fg(palette.danger)),
        None => Span::styled(
            field.help_text.clone().unwrap_or_default(),
            Style::default().fg(palette.muted),
        ),
    };
    frame.render_widget(Paragraph::new(note), note_area);
}
