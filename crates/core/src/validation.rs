//! Declarative form validation.
//!
//! Every storefront form (checkout shipping, profile edits, sign-up) is
//! described as a list of [`FieldRules`] and evaluated by [`validate`]. For
//! each field the rules run in declaration order and the first failure
//! becomes that field's message.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Minimum password length accepted by [`Rule::Password`].
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single constraint on a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present and not blank.
    Required,
    /// At least this many characters.
    MinLength(usize),
    /// At most this many characters.
    MaxLength(usize),
    /// Shape `local@domain.tld` with no whitespace.
    Email,
    /// At least [`MIN_PASSWORD_LEN`] characters.
    Password,
    /// Must equal the value of the named field.
    Matches(String),
}

/// The rules attached to one named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    field: String,
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    fn evaluate<'a, F>(&self, lookup: &F) -> Option<String>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let value = lookup(self.field.as_str()).unwrap_or("");
        let field = &self.field;

        if value.trim().is_empty() {
            // Optional blank fields are not checked any further.
            return self
                .rules
                .contains(&Rule::Required)
                .then(|| format!("{field} es requerido"));
        }

        let len = value.chars().count();
        for rule in &self.rules {
            let failure = match rule {
                Rule::Required => None,
                Rule::MinLength(min) if len < *min => {
                    Some(format!("{field} debe tener al menos {min} caracteres"))
                }
                Rule::MaxLength(max) if len > *max => {
                    Some(format!("{field} no puede tener más de {max} caracteres"))
                }
                Rule::Email if !is_valid_email(value) => Some("Email inválido".to_string()),
                Rule::Password if len < MIN_PASSWORD_LEN => Some(format!(
                    "La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"
                )),
                Rule::Matches(other) if lookup(other.as_str()).unwrap_or("") != value => {
                    Some("Los campos no coinciden".to_string())
                }
                _ => None,
            };
            if failure.is_some() {
                return failure;
            }
        }
        None
    }
}

/// Outcome of validating a form: one message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Convert a failing report into a [`DomainError::Validation`].
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_valid() {
            return Ok(());
        }
        let summary = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect::<Vec<_>>()
            .join("; ");
        Err(DomainError::validation(summary))
    }
}

/// Evaluate `rules` against the form values returned by `lookup`.
pub fn validate<'a, F>(rules: &[FieldRules], lookup: F) -> ValidationReport
where
    F: Fn(&str) -> Option<&'a str>,
{
    let errors = rules
        .iter()
        .filter_map(|r| r.evaluate(&lookup).map(|msg| (r.field.clone(), msg)))
        .collect();
    ValidationReport { errors }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain
/// with characters on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&'static str, &'static str)]) -> BTreeMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    fn signup_rules() -> Vec<FieldRules> {
        vec![
            FieldRules::new("name").required().rule(Rule::MinLength(2)).rule(Rule::MaxLength(20)),
            FieldRules::new("email").required().rule(Rule::Email),
            FieldRules::new("password").required().rule(Rule::Password),
            FieldRules::new("confirm")
                .required()
                .rule(Rule::Matches("password".to_string())),
        ]
    }

    #[test]
    fn valid_form_has_no_errors() {
        let values = form(&[
            ("name", "Diana"),
            ("email", "diana@power.market"),
            ("password", "secreto1"),
            ("confirm", "secreto1"),
        ]);
        let report = validate(&signup_rules(), |f| values.get(f).copied());
        assert!(report.is_valid());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn first_failing_rule_wins_per_field() {
        let values = form(&[
            ("name", "D"),
            ("email", "no-at-sign"),
            ("password", "123"),
            ("confirm", "321"),
        ]);
        let report = validate(&signup_rules(), |f| values.get(f).copied());
        assert_eq!(report.error_for("name"), Some("name debe tener al menos 2 caracteres"));
        assert_eq!(report.error_for("email"), Some("Email inválido"));
        assert_eq!(
            report.error_for("password"),
            Some("La contraseña debe tener al menos 6 caracteres")
        );
        assert_eq!(report.error_for("confirm"), Some("Los campos no coinciden"));
    }

    #[test]
    fn blank_required_field_is_reported() {
        let values = form(&[("name", "   ")]);
        let report = validate(&signup_rules(), |f| values.get(f).copied());
        assert_eq!(report.error_for("name"), Some("name es requerido"));
        assert_eq!(report.error_for("email"), Some("email es requerido"));
        assert!(matches!(report.into_result(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn optional_blank_field_skips_other_rules() {
        let rules = vec![FieldRules::new("phone").rule(Rule::MinLength(7))];
        let report = validate(&rules, |_| None);
        assert!(report.is_valid());
    }

    #[test]
    fn max_length_counts_characters() {
        let rules = vec![FieldRules::new("city").rule(Rule::MaxLength(4))];
        let values = form(&[("city", "Cañete")]);
        let report = validate(&rules, |f| values.get(f).copied());
        assert_eq!(report.error_for("city"), Some("city no puede tener más de 4 caracteres"));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.pe"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.b"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.de"));
    }
}
