//! The form store: owns builder state and routes every action through the reducer

use super::builder::{reduce, Action, BuilderState};
use super::model::Form;
use crate::store::Autosave;
use std::sync::Arc;

/// Single owner of [`BuilderState`].
///
/// After each dispatch that leaves a different form current, the new form is
/// appended to history and handed to the autosave worker.
#[derive(Debug, Default)]
pub struct FormStore {
    state: BuilderState,
    autosave: Option<Autosave>,
}

impl FormStore {
    pub fn new(autosave: Option<Autosave>) -> Self {
        Self {
            state: BuilderState::default(),
            autosave,
        }
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn form(&self) -> Option<&Form> {
        self.state.current_form.as_deref()
    }

    /// Current form as a shareable snapshot
    pub fn snapshot(&self) -> Option<Arc<Form>> {
        self.state.current_form.clone()
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!("Dispatch {}", action.kind());
        let before = self.state.current_form.clone();
        let state = reduce(std::mem::take(&mut self.state), action);

        let changed = match (&before, &state.current_form) {
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            (None, Some(_)) => true,
            _ => false,
        };
        self.state = state;

        if !changed {
            return;
        }
        if let Some(form) = self.state.current_form.clone() {
            self.state = reduce(
                std::mem::take(&mut self.state),
                Action::AddHistory(Arc::clone(&form)),
            );
            if let Some(autosave) = &self.autosave {
                autosave.notify(form);
            }
        }
    }

    /// Start a fresh untitled form
    pub fn create(&mut self) {
        self.dispatch(Action::SetForm(Form::untitled()));
    }

    pub fn undo(&mut self) {
        self.dispatch(Action::Undo);
    }

    pub fn redo(&mut self) {
        self.dispatch(Action::Redo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::model::{Field, FieldType, FormPatch};
    use crate::store::{FormRepository, MemoryGateway};
    use pretty_assertions::assert_eq;

    fn add_text_field(store: &mut FormStore) {
        let step_id = store.form().unwrap().steps[0].id.clone();
        store.dispatch(Action::AddField {
            step_id,
            field: Field::new(FieldType::Text),
        });
    }

    #[test]
    fn test_create_seeds_history() {
        let mut store = FormStore::default();
        store.create();
        assert_eq!(store.state().history.len(), 1);
        assert_eq!(store.state().history.index(), Some(0));
    }

    #[test]
    fn test_each_committed_edit_is_recorded() {
        let mut store = FormStore::default();
        store.create();
        add_text_field(&mut store);
        add_text_field(&mut store);
        assert_eq!(store.state().history.len(), 3);
        assert!(store.state().can_undo());
    }

    #[test]
    fn test_noop_and_ui_actions_are_not_recorded() {
        let mut store = FormStore::default();
        store.create();
        store.dispatch(Action::RemoveField {
            step_id: "nope".into(),
            field_id: "nope".into(),
        });
        store.dispatch(Action::TogglePreview(None));
        store.dispatch(Action::SelectField(None));
        assert_eq!(store.state().history.len(), 1);
    }

    #[test]
    fn test_undo_redo_do_not_grow_history() {
        let mut store = FormStore::default();
        store.create();
        add_text_field(&mut store);
        store.undo();
        assert_eq!(store.form().unwrap().field_count(), 0);
        store.redo();
        assert_eq!(store.form().unwrap().field_count(), 1);
        assert_eq!(store.state().history.len(), 2);
    }

    #[test]
    fn test_history_stays_bounded() {
        let mut store = FormStore::default();
        store.create();
        for i in 0..40 {
            store.dispatch(Action::UpdateForm(FormPatch {
                title: Some(format!("v{i}")),
                ..Default::default()
            }));
        }
        assert_eq!(store.state().history.len(), 30);
        for _ in 0..29 {
            store.undo();
        }
        assert!(!store.state().can_undo());
        assert_eq!(store.form().unwrap().title, "v10");
    }

    #[test]
    fn test_dispatch_without_form_is_quiet() {
        let mut store = FormStore::default();
        store.undo();
        store.dispatch(Action::SetCurrentStep(3));
        assert!(store.form().is_none());
        assert!(store.state().history.is_empty());
    }

    #[tokio::test]
    async fn test_committed_edits_reach_autosave() {
        let repo = FormRepository::new(Arc::new(MemoryGateway::new()));
        let (autosave, handle) = Autosave::spawn(repo.clone());
        let mut store = FormStore::new(Some(autosave));

        store.create();
        store.dispatch(Action::UpdateForm(FormPatch {
            title: Some("Feedback".into()),
            ..Default::default()
        }));
        let form_id = store.form().unwrap().id.clone();
        drop(store);
        handle.await.unwrap();

        let saved = repo.load_form(&form_id).await.unwrap().unwrap();
        assert_eq!(saved.title, "Feedback");
    }
}
