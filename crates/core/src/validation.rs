//! Field-level validation shared by the entry form and the filter form.
//!
//! Form structs derive [`validator::Validate`] for single-field rules and
//! add cross-field checks by hand. Either way the outcome is collected into
//! [`FieldErrors`], which the API layer renders next to the re-displayed
//! form instead of failing the request.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::Date;

/// Textual date format accepted by every date field (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Smallest valid importance / urgency code.
pub const MIN_CODE: i32 = 0;

/// Largest valid importance / urgency code.
pub const MAX_CODE: i32 = 2;

// ---------------------------------------------------------------------------
// Error collection
// ---------------------------------------------------------------------------

/// A single problem with one submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// All field problems found in one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, code: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any error was reported against `field`.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = FieldErrors::new();
        for (field, errs) in fields {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                out.push(&field, &err.code, message);
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<Date, CoreError> {
    Date::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| CoreError::Validation(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

/// Parse an optional date where blank means "none".
pub fn parse_optional_date(value: &str) -> Result<Option<Date>, CoreError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(value).map(Some)
    }
}

/// Whether `code` is a valid importance / urgency code.
pub fn is_valid_code(code: i32) -> bool {
    (MIN_CODE..=MAX_CODE).contains(&code)
}

// ---------------------------------------------------------------------------
// `validator` custom functions
// ---------------------------------------------------------------------------

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::from(message));
    err
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_code_text(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<i32>() {
        Ok(code) if is_valid_code(code) => Ok(()),
        Ok(_) => Err(error(
            "range",
            format!("must be between {MIN_CODE} and {MAX_CODE}"),
        )),
        Err(_) => Err(error("number", "must be a number".to_string())),
    }
}

pub(crate) fn validate_optional_date(value: &str) -> Result<(), ValidationError> {
    parse_optional_date(value)
        .map(|_| ())
        .map_err(|_| error("date", "must be a date in YYYY-MM-DD format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        let d = parse_date("2026-03-09").unwrap();
        assert_eq!(d, Date::from_ymd_opt(2026, 3, 9).unwrap());
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("09/03/2026").is_err());
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn blank_optional_date_is_none() {
        assert_eq!(parse_optional_date("  ").unwrap(), None);
    }

    #[test]
    fn code_text_validation() {
        assert!(validate_code_text("0").is_ok());
        assert!(validate_code_text(" 2 ").is_ok());
        assert_eq!(validate_code_text("3").unwrap_err().code, "range");
        assert_eq!(validate_code_text("high").unwrap_err().code, "number");
    }

    #[test]
    fn field_errors_display_joins_messages() {
        let mut errors = FieldErrors::new();
        errors.push("title", "blank", "must not be blank");
        errors.push("deadline", "date", "bad date");
        assert_eq!(
            errors.to_string(),
            "title: must not be blank; deadline: bad date"
        );
        assert!(errors.has("deadline"));
        assert!(!errors.has("urgency"));
    }

    #[test]
    fn field_errors_serialize_as_list() {
        let mut errors = FieldErrors::new();
        errors.push("title", "blank", "must not be blank");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "title");
        assert_eq!(json[0]["code"], "blank");
    }
}
