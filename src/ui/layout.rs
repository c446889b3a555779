//! Screen layout and the geometry shared by drawing and mouse hit-testing

use super::components::CARD_HEIGHT;
use super::theme::Palette;
use crate::app::App;
use crate::platform::{REDO_SHORTCUT, SAVE_SHORTCUT, UNDO_SHORTCUT};
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Height of a field card in the builder canvas
pub const FIELD_CARD_HEIGHT: u16 = CARD_HEIGHT;

/// Height of a step row in the steps panel
pub const STEP_ROW_HEIGHT: u16 = 1;

/// Split the screen into content and the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// Panels of the builder screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderLayout {
    pub header: Rect,
    pub steps: Rect,
    pub toolbox: Rect,
    pub fields: Rect,
    pub properties: Rect,
}

impl BuilderLayout {
    /// Area inside the fields panel border where cards are stacked
    pub fn field_list(&self) -> Rect {
        self.fields.inner(Margin::new(1, 1))
    }

    /// Area inside the steps panel border where step rows are stacked
    pub fn step_list(&self) -> Rect {
        self.steps.inner(Margin::new(1, 1))
    }

    pub fn toolbox_list(&self) -> Rect {
        self.toolbox.inner(Margin::new(1, 1))
    }
}

pub fn builder_layout(area: Rect) -> BuilderLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24), // Steps + toolbox
            Constraint::Min(20),    // Field canvas
            Constraint::Length(38), // Properties
        ])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(11)])
        .split(columns[0]);

    BuilderLayout {
        header: rows[0],
        steps: left[0],
        toolbox: left[1],
        fields: columns[1],
        properties: columns[2],
    }
}

/// Index of the first item shown so that `selected` stays visible
pub fn first_visible(selected: Option<usize>, count: usize, capacity: usize) -> usize {
    if capacity == 0 || count <= capacity {
        return 0;
    }
    let selected = selected.unwrap_or(0).min(count - 1);
    selected.saturating_sub(capacity - 1)
}

/// How many items of `item_height` rows fit in `list`
pub fn capacity(list: Rect, item_height: u16) -> usize {
    if item_height == 0 {
        0
    } else {
        (list.height / item_height) as usize
    }
}

/// Resolve a pointer position to an item index and the pointer's normalized
/// vertical position within that item (0 = top edge, 1 = bottom edge).
pub fn hit_item(
    list: Rect,
    item_height: u16,
    first: usize,
    count: usize,
    column: u16,
    row: u16,
) -> Option<(usize, f32)> {
    if item_height == 0
        || column < list.x
        || column >= list.x + list.width
        || row < list.y
        || row >= list.y + list.height
    {
        return None;
    }
    let offset = row - list.y;
    let index = first + (offset / item_height) as usize;
    if index >= count {
        return None;
    }
    let within = (offset % item_height) as f32;
    Some((index, (within + 0.5) / item_height as f32))
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let bar = Style::default().bg(palette.bar).fg(palette.fg);
    let mut spans = vec![Span::styled(
        format!(" {} ", app.state.current_view.title()),
        palette.selected(),
    )];

    spans.push(Span::raw(view_hints(app.state.current_view)));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(palette.success)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);

    let quit_hint = " ^C^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    frame.render_widget(Paragraph::new(quit_hint).style(bar), quit_area);
}

/// Keyboard hints for the current view
fn view_hints(view: View) -> String {
    match view {
        View::Home => "j/k:nav  Enter:open  d:delete  r:reload  q:quit".to_string(),
        View::Builder => format!(
            "Tab:panel  u/{UNDO_SHORTCUT}:undo  U/{REDO_SHORTCUT}:redo  J/K:move  o:option  p:preview  P:publish  {SAVE_SHORTCUT}:save  Esc:home"
        ),
        View::Preview => {
            "Tab:field  1-9:choose  Enter:next/submit  ←:back  F2:viewport  Esc:builder".to_string()
        }
        View::Responses => "j/k:nav  x:delete  Esc:builder".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod geometry {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_builder_panels_do_not_overlap() {
            let layout = builder_layout(Rect::new(0, 0, 120, 40));
            assert_eq!(layout.header.height, 3);
            assert!(layout.steps.x + layout.steps.width <= layout.fields.x);
            assert!(layout.fields.x + layout.fields.width <= layout.properties.x);
            assert_eq!(layout.steps.y + layout.steps.height, layout.toolbox.y);
        }

        #[test]
        fn test_first_visible_keeps_selection_in_view() {
            assert_eq!(first_visible(Some(2), 5, 10), 0);
            assert_eq!(first_visible(Some(7), 10, 3), 5);
            assert_eq!(first_visible(None, 10, 3), 0);
            assert_eq!(first_visible(Some(3), 10, 0), 0);
        }
    }

    mod hit_testing {
        use super::*;
        use pretty_assertions::assert_eq;

        fn list() -> Rect {
            Rect::new(10, 5, 20, 9)
        }

        #[test]
        fn test_rows_map_to_cards_with_pointer_fraction() {
            assert_eq!(hit_item(list(), 3, 0, 3, 12, 5), Some((0, 0.5 / 3.0)));
            assert_eq!(hit_item(list(), 3, 0, 3, 12, 6), Some((0, 0.5)));
            assert_eq!(hit_item(list(), 3, 0, 3, 12, 10), Some((1, 2.5 / 3.0)));
        }

        #[test]
        fn test_outside_or_past_end_is_none() {
            assert_eq!(hit_item(list(), 3, 0, 3, 9, 6), None);
            assert_eq!(hit_item(list(), 3, 0, 3, 12, 4), None);
            assert_eq!(hit_item(list(), 3, 0, 2, 12, 12), None);
        }

        #[test]
        fn test_scrolled_list_offsets_index() {
            assert_eq!(hit_item(list(), 3, 4, 10, 12, 8).map(|(i, _)| i), Some(5));
        }

        #[test]
        fn test_single_row_items_hit_midpoint() {
            assert_eq!(hit_item(list(), 1, 0, 4, 12, 7), Some((2, 0.5)));
        }
    }
}
