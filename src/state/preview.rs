//! End-user fill-in of a form in the preview

use super::model::{DefaultValue, Field, FieldType, Form, Step};
use super::validation::{validate_field, validate_step, FieldValue, ValidationErrors};
use std::collections::HashMap;

/// Shape raw text input into the value a field of `field_type` produces
pub fn shape_input(field_type: FieldType, raw: &str) -> FieldValue {
    if raw.is_empty() {
        return FieldValue::Empty;
    }
    match field_type {
        FieldType::Number => match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => FieldValue::Number(n),
            _ => FieldValue::Text(raw.to_string()),
        },
        _ => FieldValue::Text(raw.to_string()),
    }
}

/// Value shown before the user touches a field
pub fn initial_value(field: &Field) -> FieldValue {
    match &field.default_value {
        None => FieldValue::Empty,
        Some(DefaultValue::Flag(b)) => FieldValue::Bool(*b),
        Some(DefaultValue::Text(s)) => shape_input(field.field_type, s),
        Some(DefaultValue::List(items)) => FieldValue::List(items.clone()),
    }
}

/// Values, errors and navigation of one preview run
#[derive(Debug, Clone, Default)]
pub struct PreviewSession {
    values: HashMap<String, FieldValue>,
    /// Text as typed, so partial numbers like `4.` survive shaping
    raw: HashMap<String, String>,
    errors: ValidationErrors,
    step_index: usize,
    /// Index of the focused field within the current step
    focus: usize,
    submitted: bool,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step<'a>(&self, form: &'a Form) -> Option<&'a Step> {
        form.steps.get(self.step_index)
    }

    pub fn is_last_step(&self, form: &Form) -> bool {
        self.step_index + 1 >= form.steps.len()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field<'a>(&self, form: &'a Form) -> Option<&'a Field> {
        self.step(form).and_then(|s| s.fields.get(self.focus))
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn values(&self) -> &HashMap<String, FieldValue> {
        &self.values
    }

    pub fn error(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Entered value, falling back to the field's default
    pub fn value(&self, field: &Field) -> FieldValue {
        self.values
            .get(&field.id)
            .cloned()
            .unwrap_or_else(|| initial_value(field))
    }

    /// Store a new value; editing a field clears its error
    pub fn set_value(&mut self, field_id: &str, value: FieldValue) {
        self.values.insert(field_id.to_string(), value);
        self.errors.remove(field_id);
    }

    /// Store typed text for a text-like field
    pub fn set_input(&mut self, field: &Field, raw: &str) {
        self.raw.insert(field.id.clone(), raw.to_string());
        self.set_value(&field.id, shape_input(field.field_type, raw));
    }

    /// Text currently shown in a text-like field's input
    pub fn input_text(&self, field: &Field) -> String {
        self.raw
            .get(&field.id)
            .cloned()
            .unwrap_or_else(|| self.value(field).display())
    }

    pub fn type_char(&mut self, field: &Field, c: char) {
        let mut text = self.input_text(field);
        text.push(c);
        self.set_input(field, &text);
    }

    pub fn backspace(&mut self, field: &Field) {
        let mut text = self.input_text(field);
        text.pop();
        self.set_input(field, &text);
    }

    /// Choose an option: checkboxes toggle membership, others select one value
    pub fn choose(&mut self, field: &Field, option_value: &str) {
        let value = match field.field_type {
            FieldType::Checkbox => {
                let mut checked = match self.value(field) {
                    FieldValue::List(items) => items,
                    _ => Vec::new(),
                };
                if let Some(pos) = checked.iter().position(|v| v == option_value) {
                    checked.remove(pos);
                } else {
                    checked.push(option_value.to_string());
                }
                FieldValue::List(checked)
            }
            _ => FieldValue::Text(option_value.to_string()),
        };
        self.set_value(&field.id, value);
    }

    /// Validate `field` as the user leaves it
    pub fn blur(&mut self, field: &Field) {
        let value = self.values.get(&field.id).cloned().unwrap_or_default();
        match validate_field(field, &value) {
            Some(message) => {
                self.errors.insert(field.id.clone(), message);
            }
            None => {
                self.errors.remove(&field.id);
            }
        }
    }

    /// Move focus within the current step, validating the field left behind
    pub fn move_focus(&mut self, form: &Form, forward: bool) {
        let Some(step) = self.step(form) else {
            return;
        };
        if step.fields.is_empty() {
            return;
        }
        if let Some(field) = step.fields.get(self.focus) {
            self.blur(field);
        }
        let len = step.fields.len();
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    fn check_step(&mut self, step: &Step) -> bool {
        let errors = validate_step(step, &self.values);
        let ok = errors.is_empty();
        self.errors.extend(errors);
        ok
    }

    /// Advance when the current step validates. Returns whether it moved.
    pub fn next(&mut self, form: &Form) -> bool {
        let Some(step) = self.step(form) else {
            return false;
        };
        if !self.check_step(step) {
            return false;
        }
        if self.is_last_step(form) {
            return false;
        }
        self.step_index += 1;
        self.focus = 0;
        true
    }

    /// Go back one step; never validates
    pub fn previous(&mut self) {
        if self.step_index > 0 {
            self.step_index -= 1;
            self.focus = 0;
        }
    }

    /// Validate every step and return the values to record.
    ///
    /// On failure the session moves to the first step with an error.
    pub fn submit(&mut self, form: &Form) -> Option<HashMap<String, FieldValue>> {
        let mut first_failing = None;
        for (index, step) in form.steps.iter().enumerate() {
            if !self.check_step(step) && first_failing.is_none() {
                first_failing = Some(index);
            }
        }
        if let Some(index) = first_failing {
            tracing::debug!("Preview submit blocked on step {}", index + 1);
            if index != self.step_index {
                self.step_index = index;
                self.focus = 0;
            }
            return None;
        }
        Some(self.values.clone())
    }

    /// Show the confirmation once the submission was recorded
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
