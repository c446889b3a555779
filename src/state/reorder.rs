//! Drag reordering: turns pointer motion into discrete list-position commits
//!
//! An item only swaps with the one under the pointer once the pointer has
//! crossed the hovered item's vertical midpoint in the direction of travel.

use super::builder::Action;
use super::model::Form;

/// Normalized position of the hovered item's midpoint
pub const MIDPOINT: f32 = 0.5;

/// Whether a pointer at `pointer` (0 = top edge, 1 = bottom edge of the
/// hovered item) is far enough to move the dragged item into `hover_index`
pub fn should_commit(drag_index: usize, hover_index: usize, pointer: f32) -> bool {
    if drag_index == hover_index || pointer.is_nan() {
        return false;
    }
    let pointer = pointer.clamp(0.0, 1.0);
    if drag_index < hover_index && pointer < MIDPOINT {
        return false;
    }
    if drag_index > hover_index && pointer > MIDPOINT {
        return false;
    }
    true
}

/// Remove the item at `from` and reinsert it at `to`
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from >= items.len() || to >= items.len() {
        return None;
    }
    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Some(moved)
}

/// Which list a drag gesture reorders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderTarget {
    /// Fields of one step
    Fields { step_id: String },
    /// Steps of the form
    Steps,
}

impl ReorderTarget {
    fn ids(&self, form: &Form) -> Option<Vec<String>> {
        match self {
            Self::Fields { step_id } => form.step(step_id).map(|s| s.field_ids()),
            Self::Steps => Some(form.step_ids()),
        }
    }

    fn action(&self, new_order: Vec<String>) -> Action {
        match self {
            Self::Fields { step_id } => Action::ReorderFields {
                step_id: step_id.clone(),
                new_order,
            },
            Self::Steps => Action::ReorderSteps { new_order },
        }
    }
}

/// State of one pointer-down to pointer-up drag gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub target: ReorderTarget,
    /// Id of the dragged item
    pub origin_id: String,
    /// Index the dragged item started at
    pub origin_index: usize,
    /// Live index of the dragged item after any commits
    pub current_index: usize,
}

impl DragSession {
    pub fn begin(target: ReorderTarget, origin_id: impl Into<String>, index: usize) -> Self {
        Self {
            target,
            origin_id: origin_id.into(),
            origin_index: index,
            current_index: index,
        }
    }

    /// Handle a pointer-move over the item at `hover_index`.
    ///
    /// Returns the reorder action to dispatch once the midpoint threshold is
    /// crossed, and tracks the dragged item's new position. Returns `None`
    /// when nothing should move or the dragged item no longer exists.
    pub fn hover(&mut self, form: &Form, hover_index: usize, pointer: f32) -> Option<Action> {
        let ids = self.target.ids(form)?;

        // Re-locate the dragged item if the list changed underneath the gesture
        if ids.get(self.current_index) != Some(&self.origin_id) {
            self.current_index = ids.iter().position(|id| *id == self.origin_id)?;
        }

        if hover_index >= ids.len() || !should_commit(self.current_index, hover_index, pointer) {
            return None;
        }

        let new_order = move_item(&ids, self.current_index, hover_index)?;
        tracing::debug!(
            "Drag commit {:?}: {} -> {}",
            self.target,
            self.current_index,
            hover_index
        );
        self.current_index = hover_index;
        Some(self.target.action(new_order))
    }

    /// End the gesture; returns whether the item ended somewhere else
    pub fn release(self) -> bool {
        self.current_index != self.origin_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::model::{Field, FieldType, Step};
    use pretty_assertions::assert_eq;

    fn form_with_fields(labels: &[&str]) -> Form {
        let mut form = Form::untitled();
        for label in labels {
            let mut field = Field::new(FieldType::Text).with_label(label);
            field.id = label.to_string();
            form.steps[0].fields.push(field);
        }
        form
    }

    fn apply_order(form: &mut Form, action: &Action) {
        if let Action::ReorderFields { new_order, .. } = action {
            let fields = &mut form.steps[0].fields;
            fields.sort_by_key(|f| new_order.iter().position(|id| *id == f.id));
        }
    }

    mod threshold {
        use super::*;

        #[test]
        fn test_same_index_never_commits() {
            assert!(!should_commit(2, 2, 1.0));
        }

        #[test]
        fn test_downward_requires_passing_midpoint() {
            assert!(!should_commit(0, 1, 0.2));
            assert!(!should_commit(0, 1, 0.49));
            assert!(should_commit(0, 1, 0.5));
            assert!(should_commit(0, 1, 0.9));
        }

        #[test]
        fn test_upward_requires_passing_midpoint() {
            assert!(!should_commit(3, 1, 0.8));
            assert!(should_commit(3, 1, 0.5));
            assert!(should_commit(3, 1, 0.1));
        }

        #[test]
        fn test_out_of_range_pointer_is_clamped() {
            assert!(should_commit(0, 1, 7.0));
            assert!(!should_commit(0, 1, -3.0));
            assert!(!should_commit(0, 1, f32::NAN));
        }
    }

    mod splice {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_move_down_and_up() {
            let items = ["A", "B", "C"];
            assert_eq!(move_item(&items, 0, 2).unwrap(), vec!["B", "C", "A"]);
            assert_eq!(move_item(&items, 2, 0).unwrap(), vec!["C", "A", "B"]);
        }

        #[test]
        fn test_out_of_bounds_is_none() {
            assert!(move_item(&["A"], 0, 1).is_none());
            assert!(move_item::<&str>(&[], 0, 0).is_none());
        }
    }

    mod session {
        use super::*;
        use pretty_assertions::assert_eq;

        fn session_for(form: &Form, id: &str, index: usize) -> DragSession {
            DragSession::begin(
                ReorderTarget::Fields {
                    step_id: form.steps[0].id.clone(),
                },
                id,
                index,
            )
        }

        #[test]
        fn test_drag_first_over_last_past_midpoint() {
            let form = form_with_fields(&["A", "B", "C"]);
            let mut session = session_for(&form, "A", 0);

            let action = session.hover(&form, 2, 0.75).unwrap();
            match action {
                Action::ReorderFields { new_order, .. } => {
                    assert_eq!(new_order, vec!["B", "C", "A"]);
                }
                other => panic!("unexpected action {other:?}"),
            }
            assert_eq!(session.current_index, 2);
            assert!(session.release());
        }

        #[test]
        fn test_before_midpoint_is_noop() {
            let form = form_with_fields(&["A", "B", "C"]);
            let mut session = session_for(&form, "A", 0);
            assert!(session.hover(&form, 1, 0.3).is_none());
            assert_eq!(session.current_index, 0);
            assert!(!session.release());
        }

        #[test]
        fn test_follows_live_position_across_commits() {
            let mut form = form_with_fields(&["A", "B", "C", "D"]);
            let mut session = session_for(&form, "A", 0);

            let first = session.hover(&form, 1, 0.6).unwrap();
            apply_order(&mut form, &first);
            // Hovering the item now at index 1 is hovering itself
            assert!(session.hover(&form, 1, 0.9).is_none());

            let second = session.hover(&form, 2, 0.6).unwrap();
            apply_order(&mut form, &second);
            assert_eq!(form.steps[0].field_ids(), vec!["B", "C", "A", "D"]);

            // Moving back up needs the pointer above the midpoint
            assert!(session.hover(&form, 1, 0.7).is_none());
            let third = session.hover(&form, 1, 0.2).unwrap();
            apply_order(&mut form, &third);
            assert_eq!(form.steps[0].field_ids(), vec!["B", "A", "C", "D"]);
        }

        #[test]
        fn test_commits_preserve_membership() {
            let mut form = form_with_fields(&["A", "B", "C", "D", "E"]);
            let mut before = form.steps[0].field_ids();
            let mut session = session_for(&form, "B", 1);
            for (hover, pointer) in [(3, 0.9), (4, 0.5), (0, 0.1), (2, 0.4)] {
                if let Some(action) = session.hover(&form, hover, pointer) {
                    apply_order(&mut form, &action);
                }
            }
            let mut after = form.steps[0].field_ids();
            before.sort();
            after.sort();
            assert_eq!(before, after);
        }

        #[test]
        fn test_relocates_when_list_changed_underneath() {
            let mut form = form_with_fields(&["A", "B", "C"]);
            let mut session = session_for(&form, "C", 2);
            form.steps[0].fields.remove(0);

            let action = session.hover(&form, 0, 0.1).unwrap();
            match action {
                Action::ReorderFields { new_order, .. } => assert_eq!(new_order, vec!["C", "B"]),
                other => panic!("unexpected action {other:?}"),
            }
        }

        #[test]
        fn test_dragged_item_removed_aborts() {
            let mut form = form_with_fields(&["A", "B"]);
            let mut session = session_for(&form, "A", 0);
            form.steps[0].fields.remove(0);
            assert!(session.hover(&form, 0, 0.9).is_none());
        }

        #[test]
        fn test_hover_past_end_is_noop() {
            let form = form_with_fields(&["A", "B"]);
            let mut session = session_for(&form, "A", 0);
            assert!(session.hover(&form, 5, 0.9).is_none());
        }

        #[test]
        fn test_step_target_emits_reorder_steps() {
            let mut form = Form::untitled();
            form.steps.push(Step::new("Two"));
            let ids = form.step_ids();
            let mut session = DragSession::begin(ReorderTarget::Steps, ids[1].clone(), 1);

            let action = session.hover(&form, 0, 0.5).unwrap();
            assert_eq!(
                action,
                Action::ReorderSteps {
                    new_order: vec![ids[1].clone(), ids[0].clone()]
                }
            );
        }
    }
}
