//! Form validation shared by every console form
//!
//! Validators are pure functions of the current field values. A form is
//! re-evaluated on every keystroke and the resulting [`FormReport`] drives
//! both the inline error text and whether the submit button is enabled.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::error::{AppError, AppResult};

/// Chilean RUT, `NN.NNN.NNN-D` where D is a digit or k/K
pub static RUT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{3}\.\d{3}-[\dkK]$").expect("valid RUT pattern"));

/// Mobile phone: nine digits starting with 9
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^9\d{8}$").expect("valid phone pattern"));

pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// Minimum replacement value accepted for a tool
pub const MIN_REPLACEMENT_VALUE: i32 = 1000;

pub fn is_valid_rut(value: &str) -> bool {
    RUT_REGEX.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Names need at least three visible characters
pub fn is_valid_person_name(value: &str) -> bool {
    value.trim().chars().count() >= 3
}

/// Field-level errors keyed by wire (camelCase) field name, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Collect `validator` errors, ordering fields as they appear on the form.
    /// `order` lists struct field names; keys are converted to camelCase.
    pub fn from_validation(errors: &ValidationErrors, order: &[&str]) -> Self {
        let mut collected: Vec<(usize, String, String)> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let field = field.to_string();
                let message = errs.first().map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })?;
                let position = order.iter().position(|f| *f == field).unwrap_or(order.len());
                Some((position, camel_case(&field), message))
            })
            .collect();
        collected.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut out = Self::new();
        for (_, field, message) in collected {
            out.add(field, message);
        }
        out
    }

    /// Merge another set of errors, keeping existing messages
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.add(field, message);
        }
    }
}

impl std::fmt::Display for FieldErrors {
    /// One `• Field Name: message` line per field
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "• {}: {}", humanize_field(field), message)?;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (field, message) in iter {
            out.add(field, message);
        }
        out
    }
}

/// Outcome of evaluating a form against its current values
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormReport {
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
    pub submit_enabled: bool,
}

impl FormReport {
    pub fn from_errors(errors: FieldErrors) -> Self {
        let submit_enabled = errors.is_empty();
        Self {
            errors,
            submit_enabled,
        }
    }

    /// Blocks submission with a validation error when any field is invalid
    pub fn into_result(self) -> AppResult<()> {
        if self.submit_enabled {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// `replacement_value` -> `replacementValue`
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// `replacementValue` -> `Replacement Value`
pub fn humanize_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rut_accepts_only_dotted_format() {
        assert!(is_valid_rut("12.345.678-9"));
        assert!(is_valid_rut("12.345.678-k"));
        assert!(is_valid_rut("12.345.678-K"));

        assert!(!is_valid_rut("12345678-9"));
        assert!(!is_valid_rut("1.234.567-8"));
        assert!(!is_valid_rut("12.345.678-X"));
        assert!(!is_valid_rut("12.345.678-10"));
        assert!(!is_valid_rut("12.345.6789"));
        assert!(!is_valid_rut(" 12.345.678-9"));
        assert!(!is_valid_rut(""));
    }

    #[test]
    fn phone_must_be_nine_digits_starting_with_nine() {
        assert!(is_valid_phone("912345678"));
        assert!(!is_valid_phone("812345678"));
        assert!(!is_valid_phone("91234567"));
        assert!(!is_valid_phone("9123456789"));
        assert!(!is_valid_phone("9-1234567"));
    }

    #[test]
    fn email_requires_domain_and_tld() {
        assert!(is_valid_email("ana.perez@toolrent.cl"));
        assert!(is_valid_email("a+b@mail.example.com"));
        assert!(!is_valid_email("ana@toolrent"));
        assert!(!is_valid_email("ana.toolrent.cl"));
        assert!(!is_valid_email("ana@toolrent.c"));
    }

    #[test]
    fn person_name_is_trimmed() {
        assert!(is_valid_person_name("Ana"));
        assert!(!is_valid_person_name("  An  "));
        assert!(!is_valid_person_name(""));
    }

    #[test]
    fn field_errors_keep_first_message_and_format_lines() {
        let errors = FieldErrors::new()
            .with("replacementValue", "must be at least 1000")
            .with("name", "cannot be blank")
            .with("name", "ignored");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("cannot be blank"));
        assert_eq!(
            errors.to_string(),
            "• Replacement Value: must be at least 1000\n• Name: cannot be blank"
        );
    }

    #[test]
    fn report_disables_submit_when_errors_exist() {
        let report = FormReport::from_errors(FieldErrors::new().with("rut", "bad"));
        assert!(!report.submit_enabled);
        assert!(matches!(report.into_result(), Err(AppError::Validation(_))));

        assert!(FormReport::from_errors(FieldErrors::new()).into_result().is_ok());
    }

    #[test]
    fn case_helpers() {
        assert_eq!(camel_case("replacement_value"), "replacementValue");
        assert_eq!(camel_case("name"), "name");
        assert_eq!(humanize_field("dailyLateFee"), "Daily Late Fee");
    }
}
