//! The to-do entry form and its validated draft.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::types::{Date, DbId};
use crate::validation::{
    parse_optional_date, validate_code_text, validate_not_blank, validate_optional_date,
    FieldErrors,
};

/// Done marker stored for completed items.
pub const DONE: &str = "Y";

/// Done marker stored for open items.
pub const NOT_DONE: &str = "N";

/// Which flavour of the entry form is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Update,
}

/// The raw entry form as submitted.
///
/// Every value is kept as text so a malformed number or date turns into a
/// field error on the re-displayed form instead of a binding rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TodoForm {
    #[serde(deserialize_with = "blank_as_none")]
    pub id: Option<DbId>,
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "validate_code_text"))]
    pub importance: String,
    #[validate(custom(function = "validate_code_text"))]
    pub urgency: String,
    #[validate(custom(function = "validate_optional_date"))]
    pub deadline: String,
    #[validate(custom(function = "validate_done_marker"))]
    pub done: Option<String>,
}

/// A validated entry, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub importance: i32,
    pub urgency: i32,
    pub deadline: Option<Date>,
    pub done: String,
}

/// HTML forms submit an empty `id` for entries that were never saved.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn validate_done_marker(value: &str) -> Result<(), validator::ValidationError> {
    if value == DONE || value == NOT_DONE {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("done");
        err.message = Some(format!("must be {DONE} or {NOT_DONE}").into());
        Err(err)
    }
}

impl TodoForm {
    /// Validate the form and convert it into a [`TodoDraft`].
    ///
    /// In [`FormMode::Create`] the deadline may not lie before `today`;
    /// updates keep whatever deadline the item already had. Updates must
    /// carry an id.
    pub fn to_draft(&self, mode: FormMode, today: Date) -> Result<TodoDraft, FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        if mode == FormMode::Update && self.id.is_none() {
            errors.push("id", "required", "is required for an update");
        }

        let deadline = parse_optional_date(&self.deadline).ok().flatten();
        if mode == FormMode::Create {
            if let Some(d) = deadline {
                if d < today {
                    errors.push("deadline", "past", "must be today or later");
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // Field rules above guarantee these parse.
        let importance = self.importance.trim().parse().unwrap_or_default();
        let urgency = self.urgency.trim().parse().unwrap_or_default();

        Ok(TodoDraft {
            title: self.title.trim().to_string(),
            importance,
            urgency,
            deadline,
            done: self.done.clone().unwrap_or_else(|| NOT_DONE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn today() -> Date {
        Date::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn form(title: &str) -> TodoForm {
        TodoForm {
            id: None,
            title: title.to_string(),
            importance: "1".to_string(),
            urgency: "0".to_string(),
            deadline: "2026-12-31".to_string(),
            done: None,
        }
    }

    #[test]
    fn valid_form_becomes_draft() {
        let draft = form("  Buy milk ").to_draft(FormMode::Create, today()).unwrap();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.importance, 1);
        assert_eq!(draft.urgency, 0);
        assert_eq!(draft.deadline, Date::from_ymd_opt(2026, 12, 31));
        assert_eq!(draft.done, NOT_DONE);
    }

    #[test]
    fn blank_title_is_rejected() {
        let errors = form("   ").to_draft(FormMode::Create, today()).unwrap_err();
        assert!(errors.has("title"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn malformed_fields_are_each_reported() {
        let mut f = form("x");
        f.importance = "urgent".into();
        f.urgency = "7".into();
        f.deadline = "31/12/2026".into();
        f.done = Some("maybe".into());
        let errors = f.to_draft(FormMode::Create, today()).unwrap_err();
        assert!(errors.has("importance"));
        assert!(errors.has("urgency"));
        assert!(errors.has("deadline"));
        assert!(errors.has("done"));
    }

    #[test]
    fn blank_deadline_is_allowed() {
        let mut f = form("x");
        f.deadline = String::new();
        let draft = f.to_draft(FormMode::Create, today()).unwrap();
        assert_eq!(draft.deadline, None);
    }

    #[test]
    fn past_deadline_rejected_only_on_create() {
        let mut f = form("x");
        f.deadline = "2020-01-01".into();
        let errors = f.to_draft(FormMode::Create, today()).unwrap_err();
        assert_eq!(errors.iter().next().unwrap().code, "past");

        f.id = Some(7);
        assert_matches!(f.to_draft(FormMode::Update, today()), Ok(_));
    }

    #[test]
    fn update_requires_id() {
        let errors = form("x").to_draft(FormMode::Update, today()).unwrap_err();
        assert!(errors.has("id"));
    }

    #[test]
    fn done_marker_is_kept() {
        let mut f = form("x");
        f.done = Some(DONE.into());
        assert_eq!(f.to_draft(FormMode::Create, today()).unwrap().done, DONE);
    }
}
