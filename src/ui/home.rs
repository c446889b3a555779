//! Home screen: start blank, from a template, or reopen a saved form

use super::theme::Palette;
use super::widgets::render_scrollable_list;
use crate::app::App;
use crate::state::HomeEntry;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let muted = Style::default().fg(palette.muted);
    let items: Vec<ListItem> = app
        .state
        .home_entries()
        .into_iter()
        .map(|entry| {
            let (badge, title, detail) = match entry {
                HomeEntry::Blank => ("new", "Blank form".to_string(), "Start from scratch".to_string()),
                HomeEntry::Template(t) => ("template", t.name.to_string(), t.description.to_string()),
                HomeEntry::Saved(form) => (
                    if form.is_published { "published" } else { "draft" },
                    form.title.clone(),
                    format!(
                        "{} step(s), {} field(s), updated {}",
                        form.steps.len(),
                        form.field_count(),
                        form.updated_at.format("%Y-%m-%d %H:%M")
                    ),
                ),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{badge:>10} "), muted),
                Span::styled(title, Style::default().fg(palette.fg)),
                Span::styled(format!("  {detail}"), muted),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(true))
                .title(" formwright "),
        )
        .highlight_style(palette.selected())
        .highlight_symbol("▸ ");

    render_scrollable_list(frame, area, list, app.state.selected_index);
}
