//! Application state definitions

use super::input::EditSession;
use super::model::{FieldType, Form};
use super::preview::PreviewSession;
use super::reorder::DragSession;
use super::templates::{predefined, Template};
use crate::store::SubmissionRecord;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Builder,
    Preview,
    Responses,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Forms",
            Self::Builder => "Builder",
            Self::Preview => "Preview",
            Self::Responses => "Responses",
        }
    }
}

/// Focusable panel of the builder screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderPanel {
    Steps,
    Toolbox,
    #[default]
    Fields,
    Properties,
}

impl BuilderPanel {
    pub fn next(&self) -> Self {
        match self {
            Self::Steps => Self::Toolbox,
            Self::Toolbox => Self::Fields,
            Self::Fields => Self::Properties,
            Self::Properties => Self::Steps,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Steps => Self::Properties,
            Self::Toolbox => Self::Steps,
            Self::Fields => Self::Toolbox,
            Self::Properties => Self::Fields,
        }
    }
}

/// An entry on the home screen: templates first, then saved forms
#[derive(Debug, Clone, Copy)]
pub enum HomeEntry<'a> {
    Blank,
    Template(&'a Template),
    Saved(&'a Form),
}

/// Main application state
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Data
    pub templates: Vec<Template>,
    pub saved_forms: Vec<Form>,
    pub submissions: Vec<SubmissionRecord>,

    // Selection
    pub selected_index: usize,
    pub panel: BuilderPanel,
    pub toolbox_index: usize,
    pub property_index: usize,

    // Interaction
    pub editing: Option<EditSession>,
    pub drag: Option<DragSession>,
    pub preview: PreviewSession,
    pub confirm_delete: Option<String>,

    // Feedback
    pub status_message: Option<String>,
    errors: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_view: View::default(),
            view_history: Vec::new(),
            templates: predefined(),
            saved_forms: Vec::new(),
            submissions: Vec::new(),
            selected_index: 0,
            panel: BuilderPanel::default(),
            toolbox_index: 0,
            property_index: 0,
            editing: None,
            drag: None,
            preview: PreviewSession::default(),
            confirm_delete: None,
            status_message: None,
            errors: VecDeque::new(),
        }
    }
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Keep `selected_index` inside a list of `len` items
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Entries listed on the home screen
    pub fn home_entries(&self) -> Vec<HomeEntry<'_>> {
        let mut entries = vec![HomeEntry::Blank];
        entries.extend(self.templates.iter().map(HomeEntry::Template));
        entries.extend(self.saved_forms.iter().map(HomeEntry::Saved));
        entries
    }

    pub fn selected_home_entry(&self) -> Option<HomeEntry<'_>> {
        self.home_entries().get(self.selected_index).copied()
    }

    /// Field type highlighted in the toolbox
    pub fn toolbox_type(&self) -> FieldType {
        FieldType::ALL[self.toolbox_index % FieldType::ALL.len()]
    }

    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Error currently shown
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod selection {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_move_selection_stays_in_bounds() {
            let mut state = AppState::default();
            state.move_selection_up();
            assert_eq!(state.selected_index, 0);
            state.move_selection_down(2);
            state.move_selection_down(2);
            assert_eq!(state.selected_index, 1);
            state.move_selection_down(0);
            assert_eq!(state.selected_index, 1);
        }

        #[test]
        fn test_clamp_selection() {
            let mut state = AppState {
                selected_index: 7,
                ..Default::default()
            };
            state.clamp_selection(3);
            assert_eq!(state.selected_index, 2);
            state.clamp_selection(0);
            assert_eq!(state.selected_index, 0);
        }
    }

    mod home {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_entries_list_blank_templates_then_saved() {
            let mut state = AppState::default();
            state.saved_forms.push(Form::untitled());
            let entries = state.home_entries();
            assert_eq!(entries.len(), 1 + state.templates.len() + 1);
            assert!(matches!(entries[0], HomeEntry::Blank));
            assert!(matches!(entries[1], HomeEntry::Template(t) if t.name == "Contact Us"));
            assert!(matches!(entries.last(), Some(HomeEntry::Saved(_))));
        }

        #[test]
        fn test_toolbox_type_wraps() {
            let state = AppState {
                toolbox_index: FieldType::ALL.len() + 1,
                ..Default::default()
            };
            assert_eq!(state.toolbox_type(), FieldType::Textarea);
        }
    }

    mod errors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_error_queue_is_fifo() {
            let mut state = AppState::default();
            assert!(!state.has_errors());
            state.push_error("first".into());
            state.push_error("second".into());
            assert_eq!(state.current_error(), Some("first"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert!(!state.has_errors());
        }
    }

    #[test]
    fn test_panel_cycle_round_trips() {
        let mut panel = BuilderPanel::Steps;
        for _ in 0..4 {
            panel = panel.next();
        }
        assert_eq!(panel, BuilderPanel::Steps);
        assert_eq!(BuilderPanel::Fields.prev(), BuilderPanel::Toolbox);
    }
}
