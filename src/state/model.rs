//! Form document model
//!
//! A [`Form`] owns its steps, a [`Step`] owns its fields. Values are plain
//! data; every edit goes through the reducer in `builder.rs`, which produces
//! a fresh `Form` instead of mutating one that history may still reference.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a fresh document id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time at the millisecond precision used for stored timestamps
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Input primitive a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Dropdown,
    Checkbox,
    Radio,
    Date,
    Number,
    Email,
    Phone,
}

impl FieldType {
    /// All field types in toolbox order
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Dropdown,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Date,
        FieldType::Number,
        FieldType::Email,
        FieldType::Phone,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Textarea => "Textarea",
            Self::Dropdown => "Dropdown",
            Self::Checkbox => "Checkbox",
            Self::Radio => "Radio",
            Self::Date => "Date",
            Self::Number => "Number",
            Self::Email => "Email",
            Self::Phone => "Phone",
        }
    }

    /// Whether the field carries an option list
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Dropdown | Self::Checkbox | Self::Radio)
    }
}

/// Selectable choice of a dropdown, checkbox or radio field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            id: new_id(),
            label: label.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an option whose value is derived from its label
    pub fn from_label(label: &str) -> Self {
        let value = label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        Self::new(label, &value)
    }
}

/// Kind of a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Min,
    Max,
}

impl RuleKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::MinLength => "Min length",
            Self::MaxLength => "Max length",
            Self::Pattern => "Pattern",
            Self::Min => "Min",
            Self::Max => "Max",
        }
    }

    /// Label of this rule's message in the properties panel
    pub fn message_label(&self) -> &'static str {
        match self {
            Self::Required => "Required msg",
            Self::MinLength => "Min len msg",
            Self::MaxLength => "Max len msg",
            Self::Pattern => "Pattern msg",
            Self::Min => "Min msg",
            Self::Max => "Max msg",
        }
    }
}

/// Parameter of a validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RuleValue {
    /// Numeric reading of the parameter; `NaN` when it has none
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// Textual reading of the parameter
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Render a number the way a user typed it (`4` rather than `4.0`)
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A single validation rule attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub value: RuleValue,
    #[serde(default)]
    pub message: String,
}

impl ValidationRule {
    pub fn new(kind: RuleKind, value: RuleValue, message: impl Into<String>) -> Self {
        Self {
            kind,
            value,
            message: message.into(),
        }
    }

    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, RuleValue::Bool(true), message)
    }
}

/// Initial value shown before the user edits a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

/// One input definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Field {
    /// Create a field with the defaults the toolbox uses for `field_type`
    pub fn new(field_type: FieldType) -> Self {
        let mut field = Self {
            id: new_id(),
            field_type,
            label: format!("New {} Field", field_type.label()),
            placeholder: None,
            help_text: None,
            default_value: None,
            options: None,
            validation: None,
            class_name: None,
        };

        match field_type {
            FieldType::Text | FieldType::Email | FieldType::Phone | FieldType::Number => {
                field.placeholder = Some("Enter value here".to_string());
                field.default_value = Some(DefaultValue::Text(String::new()));
            }
            FieldType::Textarea => {
                field.placeholder = Some("Enter text here".to_string());
                field.default_value = Some(DefaultValue::Text(String::new()));
            }
            FieldType::Dropdown | FieldType::Radio => {
                field.options = Some(default_options());
                field.default_value = Some(DefaultValue::Text(String::new()));
            }
            FieldType::Checkbox => {
                field.options = Some(default_options());
                field.default_value = Some(DefaultValue::List(Vec::new()));
            }
            FieldType::Date => {
                field.default_value = Some(DefaultValue::Text(String::new()));
            }
        }

        field
    }

    /// Builder-style label setter
    #[cfg(test)]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Builder-style rule appender
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation.get_or_insert_with(Vec::new).push(rule);
        self
    }

    pub fn options(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    pub fn rules(&self) -> &[ValidationRule] {
        self.validation.as_deref().unwrap_or(&[])
    }

    /// Find the rule of a given kind
    pub fn rule(&self, kind: RuleKind) -> Option<&ValidationRule> {
        self.rules().iter().find(|r| r.kind == kind)
    }

    pub fn is_required(&self) -> bool {
        self.rule(RuleKind::Required).is_some()
    }

    /// Append an option derived from `label`, returning the new option
    pub fn add_option(&mut self, label: &str) -> FieldOption {
        let option = FieldOption::from_label(label);
        self.options
            .get_or_insert_with(Vec::new)
            .push(option.clone());
        option
    }

    /// Option list with the given labels.
    ///
    /// Each existing option is reused at most once, for the first label
    /// matching it; repeated labels get fresh options.
    pub fn options_from_labels(&self, labels: &[&str]) -> Vec<FieldOption> {
        let mut unused: Vec<&FieldOption> = self.options().iter().collect();
        labels
            .iter()
            .map(|label| match unused.iter().position(|o| o.label == *label) {
                Some(i) => unused.remove(i).clone(),
                None => FieldOption::from_label(label),
            })
            .collect()
    }

    /// Validation list with the rule of `kind` replaced, appended or removed.
    ///
    /// An existing rule keeps its position and message so declared
    /// evaluation order is stable.
    pub fn rules_with(&self, kind: RuleKind, value: Option<RuleValue>) -> Vec<ValidationRule> {
        let mut rules = self.rules().to_vec();
        match value {
            Some(value) => {
                if let Some(rule) = rules.iter_mut().find(|r| r.kind == kind) {
                    rule.value = value;
                } else {
                    let message = default_rule_message(&self.label, kind, &value);
                    rules.push(ValidationRule::new(kind, value, message));
                }
            }
            None => rules.retain(|r| r.kind != kind),
        }
        rules
    }

    /// Validation list with the message of the rule of `kind` replaced.
    ///
    /// A blank message falls back to the default wording. `None` when the
    /// field has no such rule.
    pub fn rules_with_message(&self, kind: RuleKind, message: &str) -> Option<Vec<ValidationRule>> {
        let mut rules = self.rules().to_vec();
        let rule = rules.iter_mut().find(|r| r.kind == kind)?;
        rule.message = if message.trim().is_empty() {
            default_rule_message(&self.label, kind, &rule.value)
        } else {
            message.trim().to_string()
        };
        Some(rules)
    }

    /// Replace, append or remove the rule of `kind` in place
    pub fn set_rule(&mut self, kind: RuleKind, value: Option<RuleValue>) {
        let rules = self.rules_with(kind, value);
        self.validation = if rules.is_empty() { None } else { Some(rules) };
    }

    /// Whether option ids are unique within this field
    pub fn has_unique_option_ids(&self) -> bool {
        unique_ids(self.options().iter().map(|o| o.id.as_str()))
    }

    pub(crate) fn apply(&mut self, patch: FieldPatch) {
        if let Some(field_type) = patch.field_type {
            self.field_type = field_type;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(placeholder) = patch.placeholder {
            self.placeholder = placeholder;
        }
        if let Some(help_text) = patch.help_text {
            self.help_text = help_text;
        }
        if let Some(default_value) = patch.default_value {
            self.default_value = default_value;
        }
        if let Some(options) = patch.options {
            self.options = options;
        }
        if let Some(validation) = patch.validation {
            self.validation = validation;
        }
        if let Some(class_name) = patch.class_name {
            self.class_name = class_name;
        }
    }
}

fn default_options() -> Vec<FieldOption> {
    vec![
        FieldOption::new("Option 1", "option1"),
        FieldOption::new("Option 2", "option2"),
    ]
}

/// Message used when a rule is created from the properties panel
pub fn default_rule_message(label: &str, kind: RuleKind, value: &RuleValue) -> String {
    match kind {
        RuleKind::Required => format!("{label} is required"),
        RuleKind::MinLength => format!("{label} must be at least {} characters", value.as_text()),
        RuleKind::MaxLength => format!("{label} must be at most {} characters", value.as_text()),
        RuleKind::Pattern => format!("{label} has an invalid format"),
        RuleKind::Min => format!("{label} must be at least {}", value.as_text()),
        RuleKind::Max => format!("{label} must be at most {}", value.as_text()),
    }
}

/// One page of a multi-step form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Step {
    pub fn new(title: &str) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn field_index(&self, field_id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == field_id)
    }

    pub fn field_ids(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.id.clone()).collect()
    }

    pub(crate) fn apply(&mut self, patch: StepPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
    }
}

/// The top-level multi-step document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<Step>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_published: bool,
}

impl Form {
    /// A fresh form with a single empty step
    pub fn untitled() -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            title: "Untitled Form".to_string(),
            description: None,
            steps: vec![Step::new("Step 1")],
            created_at: now,
            updated_at: now,
            is_published: false,
        }
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    pub fn step_ids(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.id.clone()).collect()
    }

    pub fn field_count(&self) -> usize {
        self.steps.iter().map(|s| s.fields.len()).sum()
    }

    /// Advance `updated_at`, strictly past its previous value
    pub(crate) fn touch(&mut self) {
        let floor = self
            .updated_at
            .checked_add_signed(Duration::milliseconds(1))
            .unwrap_or(self.updated_at);
        self.updated_at = now_millis().max(floor);
    }

    pub(crate) fn apply(&mut self, patch: FormPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(is_published) = patch.is_published {
            self.is_published = is_published;
        }
    }
}

/// Partial update of form-level properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub is_published: Option<bool>,
}

/// Partial update of a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepPatch {
    pub title: Option<String>,
}

/// Partial update of a field; `id` is deliberately not patchable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub placeholder: Option<Option<String>>,
    pub help_text: Option<Option<String>>,
    pub default_value: Option<Option<DefaultValue>>,
    pub options: Option<Option<Vec<FieldOption>>>,
    pub validation: Option<Option<Vec<ValidationRule>>>,
    pub class_name: Option<Option<String>>,
}

impl FieldPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    /// Whether an option list in this patch keeps option ids unique
    pub(crate) fn options_are_unique(&self) -> bool {
        match &self.options {
            Some(Some(options)) => unique_ids(options.iter().map(|o| o.id.as_str())),
            _ => true,
        }
    }
}

/// Editor colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Viewport the preview is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl PreviewMode {
    pub fn next(&self) -> Self {
        match self {
            Self::Desktop => Self::Tablet,
            Self::Tablet => Self::Mobile,
            Self::Mobile => Self::Desktop,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Tablet => "Tablet",
            Self::Mobile => "Mobile",
        }
    }

    /// Maximum content width in terminal columns
    pub fn max_width(&self) -> u16 {
        match self {
            Self::Desktop => 100,
            Self::Tablet => 72,
            Self::Mobile => 44,
        }
    }
}

/// Whether every id yielded is distinct
pub(crate) fn unique_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> bool {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().all(|id| seen.insert(id))
}
