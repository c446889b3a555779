//! Confirmation dialog for deletions

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render a confirmation dialog asking whether to delete `subject`
pub fn render_confirm_dialog(frame: &mut Frame, subject: &str) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::styled("y", key),
        Span::raw("/"),
        Span::styled("Enter", key),
        Span::raw(" delete  "),
        Span::styled("n", key),
        Span::raw("/"),
        Span::styled("Esc", key),
        Span::raw(" cancel"),
    ];
    let message = format!("Delete \"{}\"?\nThis cannot be undone.", truncate(subject, 40));

    render_dialog(
        frame,
        DialogConfig {
            title: "Confirm Delete",
            title_color: Color::Red,
            border_color: Color::Red,
            message: &message,
            hint: Some(hint),
            max_width: 56,
        },
    );
}

/// Truncate to at most `max_chars` characters with an ellipsis
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
