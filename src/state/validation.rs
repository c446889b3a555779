//! Field-level validation of end-user values
//!
//! Rules run in declared order and the first failing rule wins. A rule
//! whose value shape does not match (e.g. `min` against text) is skipped.

use super::model::{format_number, Field, Form, RuleKind, Step, ValidationRule};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Candidate value entered for a field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Absent, empty or falsy
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Bool(b) => !b,
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Human-readable rendering for response listings
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}

/// Failure messages keyed by field id
pub type ValidationErrors = HashMap<String, String>;

/// Validate one value against a field's rules.
///
/// Returns the message of the first failing rule, `None` when all pass.
pub fn validate_field(field: &Field, value: &FieldValue) -> Option<String> {
    field
        .rules()
        .iter()
        .find(|rule| rule_fails(rule, value))
        .map(message_for)
}

fn rule_fails(rule: &ValidationRule, value: &FieldValue) -> bool {
    match (rule.kind, value) {
        (RuleKind::Required, value) => value.is_blank(),
        (RuleKind::MinLength, FieldValue::Text(s)) => {
            (s.chars().count() as f64) < rule.value.as_number()
        }
        (RuleKind::MaxLength, FieldValue::Text(s)) => {
            (s.chars().count() as f64) > rule.value.as_number()
        }
        (RuleKind::Pattern, FieldValue::Text(s)) => {
            let pattern = rule.value.as_text();
            match Regex::new(&pattern) {
                Ok(re) => !re.is_match(s),
                Err(err) => {
                    tracing::warn!("Skipping invalid pattern {pattern:?}: {err}");
                    false
                }
            }
        }
        (RuleKind::Min, FieldValue::Number(n)) => *n < rule.value.as_number(),
        (RuleKind::Max, FieldValue::Number(n)) => *n > rule.value.as_number(),
        _ => false,
    }
}

fn message_for(rule: &ValidationRule) -> String {
    if !rule.message.is_empty() {
        return rule.message.clone();
    }
    let bound = rule.value.as_text();
    match rule.kind {
        RuleKind::Required => "This field is required".to_string(),
        RuleKind::MinLength => format!("Minimum length is {bound} characters"),
        RuleKind::MaxLength => format!("Maximum length is {bound} characters"),
        RuleKind::Pattern => "Invalid format".to_string(),
        RuleKind::Min => format!("Minimum value is {bound}"),
        RuleKind::Max => format!("Maximum value is {bound}"),
    }
}

/// Validate every field of a step; missing values count as empty
pub fn validate_step(step: &Step, values: &HashMap<String, FieldValue>) -> ValidationErrors {
    let empty = FieldValue::Empty;
    step.fields
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.id).unwrap_or(&empty);
            validate_field(field, value).map(|message| (field.id.clone(), message))
        })
        .collect()
}

/// Validate every step of a form
pub fn validate_form(form: &Form, values: &HashMap<String, FieldValue>) -> ValidationErrors {
    form.steps
        .iter()
        .flat_map(|step| validate_step(step, values))
        .collect()
}
