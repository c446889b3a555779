//! Application state module
//!
//! Document model and the pure editing core (reducer, history, validation,
//! drag reordering), plus the view state the UI renders from.

mod app_state;
pub mod builder;
pub mod history;
mod input;
pub mod model;
mod preview;
pub mod reorder;
mod store;
pub mod templates;
pub mod validation;

pub use app_state::*;
pub use builder::Action;
pub use input::*;
pub use model::*;
pub use preview::*;
pub use reorder::{DragSession, ReorderTarget};
pub use store::FormStore;
pub use validation::{validate_form, FieldValue, ValidationErrors};
