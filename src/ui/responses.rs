//! Submissions recorded for the form being edited

use super::theme::Palette;
use super::widgets::render_scrollable_list;
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(form) = app.store.form() else {
        frame.render_widget(Paragraph::new("No form open"), area);
        return;
    };
    let records = &app.state.submissions;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(area);

    let items: Vec<ListItem> = records
        .iter()
        .map(|r| ListItem::new(r.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(true))
                .title(format!(" {} response(s) ", records.len())),
        )
        .highlight_style(palette.selected())
        .highlight_symbol("▸ ");
    render_scrollable_list(frame, chunks[0], list, app.state.selected_index);

    let mut lines = Vec::new();
    if let Some(record) = records.get(app.state.selected_index) {
        for step in &form.steps {
            lines.push(Line::from(Span::styled(step.title.clone(), palette.selected())));
            for field in &step.fields {
                let value = record
                    .data
                    .get(&field.id)
                    .map(|v| v.display())
                    .unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}: ", field.label), Style::default().fg(palette.muted)),
                    Span::styled(value, Style::default().fg(palette.fg)),
                ]));
            }
        }
    } else {
        lines.push(Line::from(Span::styled(
            "No responses yet. Submit the form from the preview.",
            Style::default().fg(palette.muted),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border(false))
                    .title(format!(" {} ", form.title)),
            ),
        chunks[1],
    );
}
