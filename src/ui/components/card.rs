//! Card component

use crate::ui::theme::Palette;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Card height in rows (top border + content + bottom border)
pub const CARD_HEIGHT: u16 = 3;

/// Render a field card: bordered box with the label as title and a summary line
pub fn render_card(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    summary: Vec<Span>,
    is_selected: bool,
    is_dragging: bool,
    palette: &Palette,
) {
    let mut border = palette.border(is_selected);
    if is_dragging {
        border = border.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    let title_style = if is_selected {
        palette.selected()
    } else {
        Style::default().fg(palette.fg)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(format!(" {title} "), title_style));

    frame.render_widget(Paragraph::new(Line::from(summary)).block(block), area);
}
