//! Builder state and the reducer that applies edit actions to it
//!
//! `reduce` is total: an action whose precondition does not hold returns the
//! state unchanged. Form edits go through `Arc::make_mut`, which clones the
//! form when history still holds it, so recorded snapshots stay untouched.

use super::history::History;
use super::model::{
    unique_ids, Field, FieldPatch, Form, FormPatch, PreviewMode, Step, StepPatch, ThemeMode,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Everything the builder screen edits
#[derive(Debug, Clone, Default)]
pub struct BuilderState {
    pub current_form: Option<Arc<Form>>,
    pub current_step_index: usize,
    pub selected_field_id: Option<String>,
    pub preview_mode: PreviewMode,
    pub is_preview_active: bool,
    pub history: History,
    pub theme_mode: ThemeMode,
}

impl BuilderState {
    /// The step being edited
    pub fn current_step(&self) -> Option<&Step> {
        self.current_form
            .as_ref()
            .and_then(|form| form.steps.get(self.current_step_index))
    }

    /// The selected field, if it lives in the current step
    pub fn selected_field(&self) -> Option<&Field> {
        let id = self.selected_field_id.as_deref()?;
        self.current_step().and_then(|step| step.field(id))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

/// Edit intents accepted by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetForm(Form),
    UpdateForm(FormPatch),
    AddField {
        step_id: String,
        field: Field,
    },
    UpdateField {
        step_id: String,
        field_id: String,
        patch: FieldPatch,
    },
    RemoveField {
        step_id: String,
        field_id: String,
    },
    ReorderFields {
        step_id: String,
        new_order: Vec<String>,
    },
    AddStep(Step),
    UpdateStep {
        step_id: String,
        patch: StepPatch,
    },
    RemoveStep {
        step_id: String,
    },
    ReorderSteps {
        new_order: Vec<String>,
    },
    SetCurrentStep(usize),
    SelectField(Option<String>),
    SetPreviewMode(PreviewMode),
    TogglePreview(Option<bool>),
    AddHistory(Arc<Form>),
    Undo,
    Redo,
    SetTheme(ThemeMode),
}

impl Action {
    /// Short name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetForm(_) => "SetForm",
            Self::UpdateForm(_) => "UpdateForm",
            Self::AddField { .. } => "AddField",
            Self::UpdateField { .. } => "UpdateField",
            Self::RemoveField { .. } => "RemoveField",
            Self::ReorderFields { .. } => "ReorderFields",
            Self::AddStep(_) => "AddStep",
            Self::UpdateStep { .. } => "UpdateStep",
            Self::RemoveStep { .. } => "RemoveStep",
            Self::ReorderSteps { .. } => "ReorderSteps",
            Self::SetCurrentStep(_) => "SetCurrentStep",
            Self::SelectField(_) => "SelectField",
            Self::SetPreviewMode(_) => "SetPreviewMode",
            Self::TogglePreview(_) => "TogglePreview",
            Self::AddHistory(_) => "AddHistory",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::SetTheme(_) => "SetTheme",
        }
    }
}

/// Apply one action, producing the next state
pub fn reduce(mut state: BuilderState, action: Action) -> BuilderState {
    match action {
        Action::SetForm(form) => {
            let form = Arc::new(form);
            state.history.reset(Arc::clone(&form));
            state.current_form = Some(form);
            state.current_step_index = 0;
            state.selected_field_id = None;
        }

        Action::UpdateForm(patch) => {
            if let Some(form) = state.current_form.as_mut() {
                let form = Arc::make_mut(form);
                form.apply(patch);
                form.touch();
            }
        }

        Action::AddField { step_id, field } => {
            let field_id = field.id.clone();
            let added = edit_form(&mut state, |form| {
                let step = form.steps.iter_mut().find(|s| s.id == step_id)?;
                if step.field(&field.id).is_some() || !field.has_unique_option_ids() {
                    return None;
                }
                step.fields.push(field);
                Some(())
            });
            if added.is_some() {
                state.selected_field_id = Some(field_id);
            }
        }

        Action::UpdateField {
            step_id,
            field_id,
            patch,
        } => {
            if patch.options_are_unique() {
                edit_form(&mut state, |form| {
                    let step = form.steps.iter_mut().find(|s| s.id == step_id)?;
                    let field = step.fields.iter_mut().find(|f| f.id == field_id)?;
                    field.apply(patch);
                    Some(())
                });
            }
        }

        Action::RemoveField { step_id, field_id } => {
            let removed = edit_form(&mut state, |form| {
                let step = form.steps.iter_mut().find(|s| s.id == step_id)?;
                let index = step.field_index(&field_id)?;
                step.fields.remove(index);
                Some(())
            });
            if removed.is_some() {
                state.selected_field_id = None;
            }
        }

        Action::ReorderFields { step_id, new_order } => {
            edit_form(&mut state, |form| {
                let step = form.steps.iter_mut().find(|s| s.id == step_id)?;
                step.fields = permuted(&step.fields, &new_order, |f| &f.id)?;
                Some(())
            });
        }

        Action::AddStep(step) => {
            let added = edit_form(&mut state, |form| {
                if form.step(&step.id).is_some() {
                    return None;
                }
                form.steps.push(step);
                Some(form.steps.len() - 1)
            });
            if let Some(last) = added {
                state.current_step_index = last;
                state.selected_field_id = None;
            }
        }

        Action::UpdateStep { step_id, patch } => {
            edit_form(&mut state, |form| {
                form.steps
                    .iter_mut()
                    .find(|s| s.id == step_id)?
                    .apply(patch);
                Some(())
            });
        }

        Action::RemoveStep { step_id } => {
            let remaining = edit_form(&mut state, |form| {
                if form.steps.len() < 2 {
                    return None;
                }
                let index = form.step_index(&step_id)?;
                form.steps.remove(index);
                Some(form.steps.len())
            });
            if let Some(len) = remaining {
                state.current_step_index = state.current_step_index.min(len - 1);
                state.selected_field_id = None;
            }
        }

        Action::ReorderSteps { new_order } => {
            let active_id = state.current_step().map(|s| s.id.clone());
            let reordered = edit_form(&mut state, |form| {
                form.steps = permuted(&form.steps, &new_order, |s| &s.id)?;
                Some(())
            });
            if reordered.is_some() {
                let index = active_id
                    .and_then(|id| new_order.iter().position(|s| *s == id))
                    .unwrap_or(0);
                state.current_step_index = index;
            }
        }

        Action::SetCurrentStep(index) => {
            if let Some(form) = state.current_form.as_ref() {
                state.current_step_index = index.min(form.steps.len().saturating_sub(1));
                state.selected_field_id = None;
            }
        }

        Action::SelectField(field_id) => {
            state.selected_field_id = field_id;
        }

        Action::SetPreviewMode(mode) => {
            state.preview_mode = mode;
        }

        Action::TogglePreview(force) => {
            let active = force.unwrap_or(!state.is_preview_active);
            state.is_preview_active = active;
            if active {
                state.selected_field_id = None;
            }
        }

        Action::AddHistory(form) => {
            if state.history.record(form) {
                tracing::debug!(
                    "History now {} entries at {:?}",
                    state.history.len(),
                    state.history.index()
                );
            }
        }

        Action::Undo => {
            if let Some(form) = state.history.undo() {
                restore(&mut state, form);
            }
        }

        Action::Redo => {
            if let Some(form) = state.history.redo() {
                restore(&mut state, form);
            }
        }

        Action::SetTheme(mode) => {
            state.theme_mode = mode;
        }
    }

    state
}

/// Run `edit` against a working copy of the current form and commit it,
/// bumping `updated_at`, only when `edit` returns `Some`.
fn edit_form<T>(state: &mut BuilderState, edit: impl FnOnce(&mut Form) -> Option<T>) -> Option<T> {
    let current = state.current_form.as_ref()?;
    let mut draft = Form::clone(current);
    let result = edit(&mut draft)?;
    draft.touch();
    state.current_form = Some(Arc::new(draft));
    Some(result)
}

/// Rearrange `items` into `order`, which must name every item id exactly once
fn permuted<T: Clone>(items: &[T], order: &[String], id: impl Fn(&T) -> &String) -> Option<Vec<T>> {
    if order.len() != items.len() || !unique_ids(order.iter().map(String::as_str)) {
        return None;
    }
    let known: HashSet<&String> = items.iter().map(&id).collect();
    if !order.iter().all(|o| known.contains(o)) {
        return None;
    }
    order
        .iter()
        .map(|o| items.iter().find(|item| id(*item) == o).cloned())
        .collect()
}

fn restore(state: &mut BuilderState, form: Arc<Form>) {
    state.current_step_index = state
        .current_step_index
        .min(form.steps.len().saturating_sub(1));
    state.current_form = Some(form);
    state.selected_field_id = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::model::{FieldOption, FieldType};
    use pretty_assertions::assert_eq;

    /// Apply an action and record the resulting form the way `FormStore` does
    fn commit(state: BuilderState, action: Action) -> BuilderState {
        let before = state.current_form.clone();
        let state = reduce(state, action);
        match (&before, &state.current_form) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => state,
            (_, Some(form)) => {
                let form = Arc::clone(form);
                reduce(state, Action::AddHistory(form))
            }
            _ => state,
        }
    }

    fn loaded() -> BuilderState {
        reduce(BuilderState::default(), Action::SetForm(Form::untitled()))
    }

    fn form(state: &BuilderState) -> &Form {
        state.current_form.as_deref().unwrap()
    }

    fn first_step_id(state: &BuilderState) -> String {
        form(state).steps[0].id.clone()
    }

    fn with_fields(ids: &[&str]) -> BuilderState {
        let mut state = loaded();
        let step_id = first_step_id(&state);
        for id in ids {
            let mut field = Field::new(FieldType::Text).with_label(id);
            field.id = id.to_string();
            state = commit(
                state,
                Action::AddField {
                    step_id: step_id.clone(),
                    field,
                },
            );
        }
        state
    }

    fn field_ids(state: &BuilderState) -> Vec<String> {
        form(state).steps[0].field_ids()
    }

    mod set_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_resets_navigation_and_history() {
            let mut state = with_fields(&["a"]);
            state.current_step_index = 3;
            let state = reduce(state, Action::SetForm(Form::untitled()));

            assert_eq!(state.current_step_index, 0);
            assert!(state.selected_field_id.is_none());
            assert_eq!(state.history.len(), 1);
            assert_eq!(state.history.index(), Some(0));
            assert!(!state.can_undo());
        }
    }

    mod form_updates {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_update_form_merges_and_bumps() {
            let state = loaded();
            let before = form(&state).updated_at;
            let state = reduce(
                state,
                Action::UpdateForm(FormPatch {
                    title: Some("Survey".into()),
                    ..Default::default()
                }),
            );
            assert_eq!(form(&state).title, "Survey");
            assert!(form(&state).description.is_none());
            assert!(form(&state).updated_at > before);
        }

        #[test]
        fn test_update_at_latest_timestamp_does_not_overflow() {
            let mut stored = serde_json::to_value(Form::untitled()).unwrap();
            stored["updatedAt"] = serde_json::json!(8_210_266_876_799_999_i64);
            let stored: Form = serde_json::from_value(stored).unwrap();
            let latest = stored.updated_at;

            let state = reduce(BuilderState::default(), Action::SetForm(stored));
            let state = reduce(
                state,
                Action::UpdateForm(FormPatch {
                    title: Some("x".into()),
                    ..Default::default()
                }),
            );
            assert_eq!(form(&state).title, "x");
            assert_eq!(form(&state).updated_at, latest);
        }

        #[test]
        fn test_update_without_form_is_noop() {
            let state = reduce(
                BuilderState::default(),
                Action::UpdateForm(FormPatch::default()),
            );
            assert!(state.current_form.is_none());
        }

        #[test]
        fn test_update_does_not_touch_snapshot() {
            let state = loaded();
            let state = reduce(
                state,
                Action::UpdateForm(FormPatch {
                    title: Some("Changed".into()),
                    ..Default::default()
                }),
            );
            assert_eq!(state.history.entries()[0].form.title, "Untitled Form");
        }
    }

    mod fields {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_add_field_appends_and_selects() {
            let state = with_fields(&["a", "b"]);
            assert_eq!(field_ids(&state), vec!["a", "b"]);
            assert_eq!(state.selected_field_id.as_deref(), Some("b"));
        }

        #[test]
        fn test_add_field_to_missing_step_is_noop() {
            let state = loaded();
            let before = Arc::clone(state.current_form.as_ref().unwrap());
            let state = reduce(
                state,
                Action::AddField {
                    step_id: "nope".into(),
                    field: Field::new(FieldType::Text),
                },
            );
            assert!(Arc::ptr_eq(&before, state.current_form.as_ref().unwrap()));
            assert!(state.selected_field_id.is_none());
        }

        #[test]
        fn test_add_duplicate_field_id_is_noop() {
            let state = with_fields(&["a"]);
            let step_id = first_step_id(&state);
            let mut dup = Field::new(FieldType::Text);
            dup.id = "a".into();
            let state = reduce(
                state,
                Action::AddField {
                    step_id,
                    field: dup,
                },
            );
            assert_eq!(field_ids(&state), vec!["a"]);
        }

        #[test]
        fn test_update_field_merges_only_target() {
            let state = with_fields(&["a", "b"]);
            let step_id = first_step_id(&state);
            let state = reduce(
                state,
                Action::UpdateField {
                    step_id,
                    field_id: "b".into(),
                    patch: FieldPatch::label("Email"),
                },
            );
            let step = &form(&state).steps[0];
            assert_eq!(step.fields[0].label, "a");
            assert_eq!(step.fields[1].label, "Email");
            assert_eq!(step.fields[1].field_type, FieldType::Text);
        }

        #[test]
        fn test_update_field_rejects_duplicate_option_ids() {
            let state = with_fields(&["a"]);
            let step_id = first_step_id(&state);
            let before = form(&state).updated_at;
            let option = FieldOption::new("X", "x");
            let state = reduce(
                state,
                Action::UpdateField {
                    step_id,
                    field_id: "a".into(),
                    patch: FieldPatch {
                        options: Some(Some(vec![option.clone(), option])),
                        ..Default::default()
                    },
                },
            );
            assert_eq!(form(&state).updated_at, before);
            assert!(form(&state).steps[0].fields[0].options.is_none());
        }

        #[test]
        fn test_remove_field_clears_selection() {
            let state = with_fields(&["a", "b"]);
            let step_id = first_step_id(&state);
            let state = reduce(
                state,
                Action::RemoveField {
                    step_id,
                    field_id: "a".into(),
                },
            );
            assert_eq!(field_ids(&state), vec!["b"]);
            assert!(state.selected_field_id.is_none());
        }

        #[test]
        fn test_remove_missing_field_keeps_selection() {
            let state = with_fields(&["a"]);
            let step_id = first_step_id(&state);
            let state = reduce(
                state,
                Action::RemoveField {
                    step_id,
                    field_id: "zzz".into(),
                },
            );
            assert_eq!(state.selected_field_id.as_deref(), Some("a"));
        }

        #[test]
        fn test_reorder_fields_with_permutation() {
            let state = with_fields(&["a", "b", "c"]);
            let step_id = first_step_id(&state);
            let state = reduce(
                state,
                Action::ReorderFields {
                    step_id,
                    new_order: vec!["c".into(), "a".into(), "b".into()],
                },
            );
            assert_eq!(field_ids(&state), vec!["c", "a", "b"]);
        }

        #[test]
        fn test_reorder_fields_rejects_non_permutations() {
            let state = with_fields(&["a", "b", "c"]);
            let step_id = first_step_id(&state);
            for order in [
                vec!["a", "b"],
                vec!["a", "a", "b"],
                vec!["a", "b", "x"],
                vec!["a", "b", "c", "d"],
            ] {
                let next = reduce(
                    state.clone(),
                    Action::ReorderFields {
                        step_id: step_id.clone(),
                        new_order: order.iter().map(|s| s.to_string()).collect(),
                    },
                );
                assert_eq!(field_ids(&next), vec!["a", "b", "c"], "{order:?}");
                assert_eq!(form(&next).updated_at, form(&state).updated_at);
            }
        }
    }

    mod steps {
        use super::*;
        use pretty_assertions::assert_eq;

        fn two_steps() -> BuilderState {
            commit(loaded(), Action::AddStep(Step::new("Two")))
        }

        #[test]
        fn test_add_step_moves_to_new_last() {
            let state = two_steps();
            assert_eq!(form(&state).steps.len(), 2);
            assert_eq!(state.current_step_index, 1);
        }

        #[test]
        fn test_update_step_title() {
            let state = two_steps();
            let id = form(&state).steps[1].id.clone();
            let state = reduce(
                state,
                Action::UpdateStep {
                    step_id: id,
                    patch: StepPatch {
                        title: Some("Details".into()),
                    },
                },
            );
            assert_eq!(form(&state).steps[1].title, "Details");
        }

        #[test]
        fn test_remove_last_remaining_step_is_noop() {
            let state = loaded();
            let id = first_step_id(&state);
            let before = Arc::clone(state.current_form.as_ref().unwrap());
            let state = reduce(state, Action::RemoveStep { step_id: id });
            assert_eq!(form(&state).steps.len(), 1);
            assert!(Arc::ptr_eq(&before, state.current_form.as_ref().unwrap()));
        }

        #[test]
        fn test_remove_non_current_step_clamps_index() {
            let state = two_steps();
            assert_eq!(state.current_step_index, 1);
            let first = first_step_id(&state);
            let state = reduce(state, Action::RemoveStep { step_id: first });
            assert_eq!(form(&state).steps.len(), 1);
            assert_eq!(state.current_step_index, 0);
            assert_eq!(form(&state).steps[0].title, "Two");
        }

        #[test]
        fn test_remove_unknown_step_is_noop() {
            let state = two_steps();
            let state = reduce(
                state,
                Action::RemoveStep {
                    step_id: "nope".into(),
                },
            );
            assert_eq!(form(&state).steps.len(), 2);
            assert_eq!(state.current_step_index, 1);
        }

        #[test]
        fn test_reorder_steps_keeps_active_step() {
            let state = commit(two_steps(), Action::AddStep(Step::new("Three")));
            let ids = form(&state).step_ids();
            let state = reduce(state, Action::SetCurrentStep(0));
            let state = reduce(
                state,
                Action::ReorderSteps {
                    new_order: vec![ids[2].clone(), ids[1].clone(), ids[0].clone()],
                },
            );
            assert_eq!(state.current_step_index, 2);
            assert_eq!(state.current_step().unwrap().id, ids[0]);
        }

        #[test]
        fn test_set_current_step_clamps_and_clears_selection() {
            let mut state = two_steps();
            state.selected_field_id = Some("x".into());
            let state = reduce(state, Action::SetCurrentStep(99));
            assert_eq!(state.current_step_index, 1);
            assert!(state.selected_field_id.is_none());
        }
    }

    mod ui_flags {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_toggle_preview_clears_selection_on_enter() {
            let state = with_fields(&["a"]);
            let state = reduce(state, Action::TogglePreview(None));
            assert!(state.is_preview_active);
            assert!(state.selected_field_id.is_none());
            let state = reduce(state, Action::TogglePreview(Some(true)));
            assert!(state.is_preview_active);
            let state = reduce(state, Action::TogglePreview(None));
            assert!(!state.is_preview_active);
        }

        #[test]
        fn test_select_field_is_unchecked() {
            let state = reduce(loaded(), Action::SelectField(Some("ghost".into())));
            assert_eq!(state.selected_field_id.as_deref(), Some("ghost"));
            assert!(state.selected_field().is_none());
        }

        #[test]
        fn test_preview_mode_and_theme() {
            let state = reduce(loaded(), Action::SetPreviewMode(PreviewMode::Mobile));
            let state = reduce(state, Action::SetTheme(ThemeMode::Dark));
            assert_eq!(state.preview_mode, PreviewMode::Mobile);
            assert_eq!(state.theme_mode, ThemeMode::Dark);
        }
    }

    mod undo_redo {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_symmetry_over_n_edits() {
            let mut state = loaded();
            let created = form(&state).clone();
            let step_id = first_step_id(&state);
            let mut after_each = Vec::new();

            for i in 0..6 {
                state = commit(
                    state,
                    Action::AddField {
                        step_id: step_id.clone(),
                        field: Field::new(FieldType::Text).with_label(&format!("f{i}")),
                    },
                );
                after_each.push(form(&state).clone());
            }

            for _ in 0..6 {
                state = commit(state, Action::Undo);
            }
            assert_eq!(form(&state), &created);
            assert!(state.selected_field_id.is_none());

            for _ in 0..6 {
                state = commit(state, Action::Redo);
            }
            assert_eq!(form(&state), after_each.last().unwrap());
        }

        #[test]
        fn test_new_edit_after_undo_drops_redo() {
            let state = with_fields(&["a", "b"]);
            let state = commit(state, Action::Undo);
            assert!(state.can_redo());
            let step_id = first_step_id(&state);
            let state = commit(
                state,
                Action::AddField {
                    step_id,
                    field: Field::new(FieldType::Date),
                },
            );
            assert!(!state.can_redo());
            let redone = commit(state.clone(), Action::Redo);
            assert_eq!(form(&redone), form(&state));
        }

        #[test]
        fn test_history_bound_after_many_edits() {
            let mut state = loaded();
            for i in 0..35 {
                state = commit(
                    state,
                    Action::UpdateForm(FormPatch {
                        title: Some(format!("t{i}")),
                        ..Default::default()
                    }),
                );
            }
            assert_eq!(state.history.len(), 30);
            assert_eq!(state.history.entries()[0].form.title, "t5");
        }

        #[test]
        fn test_undo_clamps_step_index() {
            let state = commit(loaded(), Action::AddStep(Step::new("Two")));
            assert_eq!(state.current_step_index, 1);
            let state = commit(state, Action::Undo);
            assert_eq!(form(&state).steps.len(), 1);
            assert_eq!(state.current_step_index, 0);
        }

        #[test]
        fn test_undo_at_start_is_noop() {
            let state = loaded();
            let before = Arc::clone(state.current_form.as_ref().unwrap());
            let state = reduce(state, Action::Undo);
            assert!(Arc::ptr_eq(&before, state.current_form.as_ref().unwrap()));
        }

        #[test]
        fn test_add_history_after_undo_is_deduplicated() {
            let state = with_fields(&["a"]);
            let state = commit(state, Action::Undo);
            assert_eq!(state.history.len(), 2);
            assert_eq!(state.history.index(), Some(0));
        }
    }

    #[test]
    fn test_action_kind_names() {
        assert_eq!(Action::Undo.kind(), "Undo");
        assert_eq!(Action::SetCurrentStep(1).kind(), "SetCurrentStep");
    }
}
