//! Builder screen: steps, toolbox, field canvas and properties

use super::components::render_card;
use super::layout::{
    builder_layout, capacity, first_visible, BuilderLayout, FIELD_CARD_HEIGHT, STEP_ROW_HEIGHT,
};
use super::theme::Palette;
use super::widgets::draw_input;
use crate::app::App;
use crate::state::{
    BuilderPanel, EditTarget, Field, FieldType, Form, Property, ReorderTarget,
};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(form) = app.store.form() else {
        frame.render_widget(Paragraph::new("No form open. Press Esc for the form list."), area);
        return;
    };
    let layout = builder_layout(area);

    draw_header(frame, &layout, app, form, palette);
    draw_steps(frame, &layout, app, form, palette);
    draw_toolbox(frame, &layout, app, palette);
    draw_fields(frame, &layout, app, form, palette);
    draw_properties(frame, &layout, app, palette);
}

fn panel_block<'a>(title: &'a str, focused: bool, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused))
        .title(format!(" {title} "))
}

fn draw_header(frame: &mut Frame, layout: &BuilderLayout, app: &App, form: &Form, palette: &Palette) {
    let state = app.store.state();
    let muted = Style::default().fg(palette.muted);
    let badge = if form.is_published {
        Span::styled(" published ", Style::default().fg(palette.success))
    } else {
        Span::styled(" draft ", muted)
    };
    let history = match (state.history.index(), state.history.current()) {
        (Some(i), Some(snapshot)) => format!(
            "history {}/{} @ {}",
            i + 1,
            state.history.len(),
            snapshot.timestamp.with_timezone(&Local).format("%H:%M:%S")
        ),
        _ => "history empty".to_string(),
    };
    let undo_style = |enabled: bool| if enabled { Style::default().fg(palette.fg) } else { muted };

    let line = Line::from(vec![
        Span::styled(form.title.clone(), palette.selected()),
        badge,
        Span::styled(
            form.description.clone().unwrap_or_default(),
            muted.add_modifier(Modifier::ITALIC),
        ),
        Span::raw("   "),
        Span::styled("undo", undo_style(state.can_undo())),
        Span::raw(" "),
        Span::styled("redo", undo_style(state.can_redo())),
        Span::styled(format!("  {history}  {}", state.preview_mode.label()), muted),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).border_style(palette.border(false))),
        layout.header,
    );
}

fn dragging(app: &App, target: &ReorderTarget, id: &str) -> bool {
    app.state
        .drag
        .as_ref()
        .is_some_and(|d| d.target == *target && d.origin_id == id)
}

fn draw_steps(frame: &mut Frame, layout: &BuilderLayout, app: &App, form: &Form, palette: &Palette) {
    let focused = app.state.panel == BuilderPanel::Steps;
    frame.render_widget(panel_block("Steps", focused, palette), layout.steps);

    let list = layout.step_list();
    let current = app.store.state().current_step_index;
    let first = first_visible(Some(current), form.steps.len(), capacity(list, STEP_ROW_HEIGHT));

    for (row, (index, step)) in form.steps.iter().enumerate().skip(first).enumerate() {
        let y = list.y + row as u16 * STEP_ROW_HEIGHT;
        if y >= list.y + list.height {
            break;
        }
        let mut style = if index == current {
            palette.selected()
        } else {
            Style::default().fg(palette.fg)
        };
        if dragging(app, &ReorderTarget::Steps, &step.id) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let marker = if index == current { "▸" } else { " " };
        let text = format!("{marker}{}. {} ({})", index + 1, step.title, step.fields.len());
        frame.render_widget(
            Paragraph::new(Span::styled(text, style)),
            Rect::new(list.x, y, list.width, STEP_ROW_HEIGHT),
        );
    }
}

fn draw_toolbox(frame: &mut Frame, layout: &BuilderLayout, app: &App, palette: &Palette) {
    let focused = app.state.panel == BuilderPanel::Toolbox;
    let lines: Vec<Line> = FieldType::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let style = if focused && i == app.state.toolbox_index {
                palette.selected()
            } else {
                Style::default().fg(palette.fg)
            };
            Line::from(Span::styled(format!("+ {}", t.label()), style))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(panel_block("Add field", focused, palette)),
        layout.toolbox,
    );
}

/// One-line description shown inside a field card
fn field_summary<'a>(field: &'a Field, palette: &Palette) -> Vec<Span<'a>> {
    let muted = Style::default().fg(palette.muted);
    let mut spans = vec![Span::styled(field.field_type.label(), Style::default().fg(palette.accent))];
    if field.is_required() {
        spans.push(Span::styled(" *", Style::default().fg(palette.danger)));
    }
    if field.field_type.has_options() {
        let labels: Vec<&str> = field.options().iter().map(|o| o.label.as_str()).collect();
        spans.push(Span::styled(format!("  {}", labels.join(" | ")), muted));
    } else if let Some(placeholder) = &field.placeholder {
        spans.push(Span::styled(format!("  {placeholder}"), muted));
    }
    let extra = field.rules().len().saturating_sub(usize::from(field.is_required()));
    if extra > 0 {
        spans.push(Span::styled(format!("  +{extra} rule(s)"), muted));
    }
    spans
}

fn draw_fields(frame: &mut Frame, layout: &BuilderLayout, app: &App, form: &Form, palette: &Palette) {
    let state = app.store.state();
    let focused = app.state.panel == BuilderPanel::Fields;
    let Some(step) = form.steps.get(state.current_step_index) else {
        return;
    };
    let title = format!("{} ({} fields)", step.title, step.fields.len());
    frame.render_widget(panel_block(&title, focused, palette), layout.fields);

    let list = layout.field_list();
    if step.fields.is_empty() {
        frame.render_widget(
            Paragraph::new("No fields yet. Pick a type in the toolbox and press Enter.")
                .style(Style::default().fg(palette.muted))
                .wrap(Wrap { trim: true }),
            list,
        );
        return;
    }

    let selected = state
        .selected_field_id
        .as_deref()
        .and_then(|id| step.field_index(id));
    let first = first_visible(selected, step.fields.len(), capacity(list, FIELD_CARD_HEIGHT));
    let target = ReorderTarget::Fields {
        step_id: step.id.clone(),
    };

    for (row, (index, field)) in step.fields.iter().enumerate().skip(first).enumerate() {
        let y = list.y + row as u16 * FIELD_CARD_HEIGHT;
        if y + FIELD_CARD_HEIGHT > list.y + list.height {
            break;
        }
        render_card(
            frame,
            Rect::new(list.x, y, list.width, FIELD_CARD_HEIGHT),
            &field.label,
            field_summary(field, palette),
            selected == Some(index),
            dragging(app, &target, &field.id),
            palette,
        );
    }
}

fn draw_properties(frame: &mut Frame, layout: &BuilderLayout, app: &App, palette: &Palette) {
    let focused = app.state.panel == BuilderPanel::Properties;
    let area = layout.properties;
    let muted = Style::default().fg(palette.muted);

    // Inline edits of form or step properties take over the panel
    if let Some(edit) = &app.state.editing {
        let label = match &edit.target {
            EditTarget::FormTitle => "Form title",
            EditTarget::FormDescription => "Form description",
            EditTarget::StepTitle { .. } => "Step title",
            EditTarget::Field { property, .. } => property.label(),
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        draw_input(frame, chunks[0], label, edit.input.value(), None, true, palette);
        frame.render_widget(
            Paragraph::new("Enter: apply  Esc: cancel").style(muted),
            chunks[1],
        );
        return;
    }

    let Some(field) = app.store.state().selected_field() else {
        let lines = vec![
            Line::from(Span::styled("No field selected", muted)),
            Line::from(""),
            Line::from("T: edit form title"),
            Line::from("D: edit form description"),
            Line::from("R: view responses"),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(panel_block("Properties", focused, palette)),
            area,
        );
        return;
    };

    let lines: Vec<Line> = Property::for_field(field)
        .into_iter()
        .enumerate()
        .map(|(i, property)| {
            let style = if focused && i == app.state.property_index {
                palette.selected()
            } else {
                Style::default().fg(palette.fg)
            };
            Line::from(vec![
                Span::styled(format!("{:<12}", property.label()), style),
                Span::styled(property.display(field), muted),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel_block("Properties", focused, palette)),
        area,
    );
}
