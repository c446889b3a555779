//! Predefined starting forms

use super::model::{
    new_id, now_millis, Field, FieldOption, FieldType, Form, RuleKind, RuleValue, Step,
    ValidationRule,
};

/// Pattern the templates use for email fields
pub const EMAIL_PATTERN: &str = r"^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$";

/// A named form blueprint
#[derive(Debug, Clone)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    title: &'static str,
    intro: &'static str,
    steps: fn() -> Vec<Step>,
}

impl Template {
    /// Create a new form from this template with fresh ids and timestamps
    pub fn instantiate(&self) -> Form {
        let now = now_millis();
        Form {
            id: new_id(),
            title: self.title.to_string(),
            description: Some(self.intro.to_string()),
            steps: (self.steps)(),
            created_at: now,
            updated_at: now,
            is_published: false,
        }
    }
}

pub fn predefined() -> Vec<Template> {
    vec![
        Template {
            id: "contact-form",
            name: "Contact Us",
            description: "Simple contact form with name, email, and message",
            title: "Contact Us",
            intro: "We would love to hear from you. Please fill out this form.",
            steps: contact_steps,
        },
        Template {
            id: "signup-form",
            name: "User Registration",
            description: "Multi-step registration form with account and profile details",
            title: "Create an Account",
            intro: "Complete the form below to register",
            steps: registration_steps,
        },
    ]
}

fn required(field_type: FieldType, label: &str, placeholder: Option<&str>, message: &str) -> Field {
    Field {
        id: new_id(),
        field_type,
        label: label.to_string(),
        placeholder: placeholder.map(str::to_string),
        help_text: None,
        default_value: None,
        options: None,
        validation: Some(vec![ValidationRule::required(message)]),
        class_name: None,
    }
}

fn email() -> Field {
    required(
        FieldType::Email,
        "Email Address",
        Some("Enter your email address"),
        "Email is required",
    )
    .with_rule(ValidationRule::new(
        RuleKind::Pattern,
        RuleValue::Text(EMAIL_PATTERN.to_string()),
        "Please enter a valid email",
    ))
}

fn full_name() -> Field {
    required(
        FieldType::Text,
        "Full Name",
        Some("Enter your full name"),
        "Name is required",
    )
}

fn contact_steps() -> Vec<Step> {
    vec![Step::new("Contact Information").with_fields(vec![
        full_name(),
        email(),
        required(
            FieldType::Textarea,
            "Message",
            Some("Enter your message"),
            "Message is required",
        ),
    ])]
}

fn registration_steps() -> Vec<Step> {
    let username = required(
        FieldType::Text,
        "Username",
        Some("Choose a username"),
        "Username is required",
    )
    .with_rule(ValidationRule::new(
        RuleKind::MinLength,
        RuleValue::Number(4.0),
        "Username must be at least 4 characters",
    ));

    let mut country = required(FieldType::Dropdown, "Country", None, "Country is required");
    country.options = Some(vec![
        FieldOption::new("United States", "us"),
        FieldOption::new("Canada", "ca"),
        FieldOption::new("United Kingdom", "uk"),
        FieldOption::new("Australia", "au"),
    ]);

    vec![
        Step::new("Account Information").with_fields(vec![username, email()]),
        Step::new("Personal Details").with_fields(vec![
            full_name(),
            required(
                FieldType::Date,
                "Date of Birth",
                None,
                "Date of birth is required",
            ),
            country,
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::validation::{validate_field, FieldValue};
    use pretty_assertions::assert_eq;

    fn by_name(name: &str) -> Form {
        predefined()
            .into_iter()
            .find(|t| t.name == name)
            .unwrap()
            .instantiate()
    }

    #[test]
    fn test_contact_us_shape() {
        let form = by_name("Contact Us");
        assert_eq!(form.steps.len(), 1);
        let labels: Vec<_> = form.steps[0]
            .fields
            .iter()
            .map(|f| f.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Full Name", "Email Address", "Message"]);
        assert!(form.steps[0].fields.iter().all(Field::is_required));
    }

    #[test]
    fn test_registration_shape() {
        let form = by_name("User Registration");
        assert_eq!(form.title, "Create an Account");
        assert_eq!(form.steps.len(), 2);
        let username = &form.steps[0].fields[0];
        assert_eq!(
            username.rule(RuleKind::MinLength).map(|r| r.value.as_number()),
            Some(4.0)
        );
        let country = &form.steps[1].fields[2];
        assert_eq!(country.field_type, FieldType::Dropdown);
        assert_eq!(country.options().len(), 4);
        assert_eq!(country.options()[2].value, "uk");
        assert!(country.has_unique_option_ids());
    }

    #[test]
    fn test_instances_get_fresh_ids() {
        let a = by_name("Contact Us");
        let b = by_name("Contact Us");
        assert_ne!(a.id, b.id);
        assert_ne!(a.steps[0].id, b.steps[0].id);
        assert_ne!(a.steps[0].fields[0].id, b.steps[0].fields[0].id);
    }

    #[test]
    fn test_email_pattern_rule() {
        let form = by_name("Contact Us");
        let email = &form.steps[0].fields[1];
        let text = |s: &str| FieldValue::Text(s.to_string());
        assert_eq!(validate_field(email, &text("ada@example.org")), None);
        assert_eq!(
            validate_field(email, &text("not-an-email")),
            Some("Please enter a valid email".to_string())
        );
        assert_eq!(
            validate_field(email, &text("")),
            Some("Email is required".to_string())
        );
    }
}
