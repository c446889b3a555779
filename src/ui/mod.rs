//! UI module for rendering the TUI

mod builder;
mod components;
mod home;
pub mod layout;
mod preview;
mod responses;
mod theme;
mod widgets;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_dialog, render_error_dialog};
use ratatui::{widgets::Block, Frame};
use theme::Palette;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = Palette::for_mode(app.store.state().theme_mode);
    frame.render_widget(Block::default().style(palette.base()), area);

    let (content_area, status_area) = layout::create_layout(area);

    match app.state.current_view {
        View::Home => home::draw(frame, content_area, app, &palette),
        View::Builder => builder::draw(frame, content_area, app, &palette),
        View::Preview => preview::draw(frame, content_area, app, &palette),
        View::Responses => responses::draw(frame, content_area, app, &palette),
    }

    layout::draw_status_bar(frame, status_area, app, &palette);

    // Modals draw last so they sit on top
    if let Some(subject) = &app.state.confirm_delete {
        render_confirm_dialog(frame, subject);
    }
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message, app.state.error_count());
    }
}
