//! Reusable UI widget helpers

use super::theme::Palette;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListState, Paragraph, Wrap},
    Frame,
};

/// Render a list that scrolls to keep the selected item in view
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Draw a bordered single-value input with a trailing cursor when active
pub fn draw_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: Option<&str>,
    is_active: bool,
    palette: &Palette,
) {
    let cursor = if is_active { "▌" } else { "" };
    let text = if value.is_empty() {
        Span::styled(placeholder.unwrap_or("").to_string(), Style::default().fg(palette.muted))
    } else {
        Span::styled(value.to_string(), Style::default().fg(palette.fg))
    };

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(palette.border(is_active));

    let line = Line::from(vec![text, Span::styled(cursor, Style::default().fg(palette.accent))]);
    frame.render_widget(
        Paragraph::new(line).wrap(Wrap { trim: false }).block(block),
        area,
    );
}
