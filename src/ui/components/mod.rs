//! Reusable UI components

mod card;
mod dialog;

pub use card::{render_card, CARD_HEIGHT};
pub use dialog::{render_confirm_dialog, render_error_dialog};
