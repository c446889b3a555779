//! Inline text editing of form, step and field properties

use super::builder::Action;
use super::model::{
    Field, FieldPatch, FieldType, Form, FormPatch, RuleKind, RuleValue, StepPatch,
};

/// Single-line text buffer edited one character at a time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    value: String,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop_char(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Editable property of a field, in panel order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Label,
    Placeholder,
    HelpText,
    Options,
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Min,
    Max,
    /// Error message of the field's rule of this kind
    Message(RuleKind),
}

impl Property {
    /// Properties that apply to `field`
    pub fn for_field(field: &Field) -> Vec<Property> {
        let mut props = vec![Self::Label];
        match field.field_type {
            FieldType::Dropdown | FieldType::Checkbox | FieldType::Radio => {
                props.extend([Self::HelpText, Self::Options, Self::Required]);
            }
            FieldType::Date => props.extend([Self::HelpText, Self::Required]),
            FieldType::Number => props.extend([
                Self::Placeholder,
                Self::HelpText,
                Self::Required,
                Self::Min,
                Self::Max,
            ]),
            FieldType::Text | FieldType::Textarea | FieldType::Email | FieldType::Phone => {
                props.extend([
                    Self::Placeholder,
                    Self::HelpText,
                    Self::Required,
                    Self::MinLength,
                    Self::MaxLength,
                    Self::Pattern,
                ])
            }
        }
        props
            .into_iter()
            .flat_map(|prop| {
                let message = prop
                    .rule_kind()
                    .filter(|kind| field.rule(*kind).is_some())
                    .map(Self::Message);
                std::iter::once(prop).chain(message)
            })
            .collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Label => "Label",
            Self::Placeholder => "Placeholder",
            Self::HelpText => "Help text",
            Self::Options => "Options",
            Self::Required => RuleKind::Required.label(),
            Self::MinLength => RuleKind::MinLength.label(),
            Self::MaxLength => RuleKind::MaxLength.label(),
            Self::Pattern => RuleKind::Pattern.label(),
            Self::Min => RuleKind::Min.label(),
            Self::Max => RuleKind::Max.label(),
            Self::Message(kind) => kind.message_label(),
        }
    }

    fn rule_kind(&self) -> Option<RuleKind> {
        match self {
            Self::Required => Some(RuleKind::Required),
            Self::MinLength => Some(RuleKind::MinLength),
            Self::MaxLength => Some(RuleKind::MaxLength),
            Self::Pattern => Some(RuleKind::Pattern),
            Self::Min => Some(RuleKind::Min),
            Self::Max => Some(RuleKind::Max),
            _ => None,
        }
    }

    /// Toggled with Enter instead of edited as text
    pub fn is_toggle(&self) -> bool {
        matches!(self, Self::Required)
    }

    /// Current value rendered for the properties panel and as the edit seed
    pub fn display(&self, field: &Field) -> String {
        match self {
            Self::Label => field.label.clone(),
            Self::Placeholder => field.placeholder.clone().unwrap_or_default(),
            Self::HelpText => field.help_text.clone().unwrap_or_default(),
            Self::Options => field
                .options()
                .iter()
                .map(|o| o.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Required => String::from(if field.is_required() { "yes" } else { "no" }),
            Self::Message(kind) => field
                .rule(*kind)
                .map(|rule| rule.message.clone())
                .unwrap_or_default(),
            _ => self
                .rule_kind()
                .and_then(|kind| field.rule(kind))
                .map(|rule| rule.value.as_text())
                .unwrap_or_default(),
        }
    }

    /// Patch produced by toggling this property
    pub fn toggle_patch(&self, field: &Field) -> Option<FieldPatch> {
        if !self.is_toggle() {
            return None;
        }
        let value = (!field.is_required()).then_some(RuleValue::Bool(true));
        Some(rule_patch(field, RuleKind::Required, value))
    }

    /// Patch produced by committing `text` for this property.
    ///
    /// Blank input clears optional members and removes rules.
    pub fn text_patch(&self, field: &Field, text: &str) -> Result<FieldPatch, String> {
        let trimmed = text.trim();
        let optional = || (!trimmed.is_empty()).then(|| trimmed.to_string());
        let patch = match self {
            Self::Label => FieldPatch::label(trimmed),
            Self::Placeholder => FieldPatch {
                placeholder: Some(optional()),
                ..Default::default()
            },
            Self::HelpText => FieldPatch {
                help_text: Some(optional()),
                ..Default::default()
            },
            Self::Options => {
                let labels: Vec<&str> = trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect();
                FieldPatch {
                    options: Some(Some(field.options_from_labels(&labels))),
                    ..Default::default()
                }
            }
            Self::Required => self.toggle_patch(field).unwrap_or_default(),
            Self::Message(kind) => {
                let rules = field
                    .rules_with_message(*kind, trimmed)
                    .ok_or_else(|| format!("{} rule is not set", kind.label()))?;
                FieldPatch {
                    validation: Some(Some(rules)),
                    ..Default::default()
                }
            }
            Self::Pattern => {
                let value = optional().map(RuleValue::Text);
                rule_patch(field, RuleKind::Pattern, value)
            }
            Self::MinLength | Self::MaxLength | Self::Min | Self::Max => {
                let value = if trimmed.is_empty() {
                    None
                } else {
                    let n: f64 = trimmed
                        .parse()
                        .map_err(|_| format!("{} must be a number", self.label()))?;
                    Some(RuleValue::Number(n))
                };
                let kind = self.rule_kind().unwrap_or(RuleKind::Min);
                rule_patch(field, kind, value)
            }
        };
        Ok(patch)
    }
}

/// Patch carrying `field`'s validation list with the rule of `kind` set or removed
fn rule_patch(field: &Field, kind: RuleKind, value: Option<RuleValue>) -> FieldPatch {
    let mut edited = field.clone();
    edited.set_rule(kind, value);
    FieldPatch {
        validation: Some(edited.validation),
        ..Default::default()
    }
}

/// What an inline edit writes back to
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    FormTitle,
    FormDescription,
    StepTitle { step_id: String },
    Field {
        step_id: String,
        field_id: String,
        property: Property,
    },
}

/// An inline edit in progress
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub target: EditTarget,
    pub input: TextInput,
}

impl EditSession {
    /// Start editing `target`, seeded with its current value
    pub fn begin(form: &Form, target: EditTarget) -> Option<Self> {
        let seed = match &target {
            EditTarget::FormTitle => form.title.clone(),
            EditTarget::FormDescription => form.description.clone().unwrap_or_default(),
            EditTarget::StepTitle { step_id } => form.step(step_id)?.title.clone(),
            EditTarget::Field {
                step_id,
                field_id,
                property,
            } => property.display(form.step(step_id)?.field(field_id)?),
        };
        Some(Self {
            target,
            input: TextInput::new(seed),
        })
    }

    /// Turn the buffer into the action that applies it
    pub fn commit(&self, form: &Form) -> Result<Option<Action>, String> {
        let text = self.input.value();
        let action = match &self.target {
            EditTarget::FormTitle => Action::UpdateForm(FormPatch {
                title: Some(text.trim().to_string()),
                ..Default::default()
            }),
            EditTarget::FormDescription => {
                let trimmed = text.trim();
                Action::UpdateForm(FormPatch {
                    description: Some((!trimmed.is_empty()).then(|| trimmed.to_string())),
                    ..Default::default()
                })
            }
            EditTarget::StepTitle { step_id } => Action::UpdateStep {
                step_id: step_id.clone(),
                patch: StepPatch {
                    title: Some(text.trim().to_string()),
                },
            },
            EditTarget::Field {
                step_id,
                field_id,
                property,
            } => {
                let Some(field) = form.step(step_id).and_then(|s| s.field(field_id)) else {
                    return Ok(None);
                };
                Action::UpdateField {
                    step_id: step_id.clone(),
                    field_id: field_id.clone(),
                    patch: property.text_patch(field, text)?,
                }
            }
        };
        Ok(Some(action))
    }
}
