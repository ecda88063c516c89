//! Criteria builder: sparse filter form to conjunctive predicate set.
//!
//! Blank or sentinel fields mean "no constraint" and add nothing. Every
//! other field adds exactly one [`Predicate`]. The title predicate is the
//! exception: it is always present and matches every row when the title
//! filter is empty.
//!
//! The resulting [`PredicateSet`] names columns through [`TodoField`] and
//! carries typed values, so the storage layer renders it without knowing
//! anything about the filter form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::pagination::{Direction, Sort};
use crate::todo::DONE;
use crate::types::Date;
use crate::validation::{
    is_valid_code, parse_optional_date, validate_optional_date, FieldErrors, MAX_CODE,
};

/// Importance / urgency value meaning "do not filter on this field".
pub const UNCONSTRAINED: i32 = -1;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Queryable column of the `todos` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoField {
    Id,
    Title,
    Importance,
    Urgency,
    Deadline,
    Done,
}

impl TodoField {
    pub const ALL: [TodoField; 6] = [
        TodoField::Id,
        TodoField::Title,
        TodoField::Importance,
        TodoField::Urgency,
        TodoField::Deadline,
        TodoField::Done,
    ];

    /// Storage column name.
    pub const fn column(self) -> &'static str {
        match self {
            TodoField::Id => "id",
            TodoField::Title => "title",
            TodoField::Importance => "importance",
            TodoField::Urgency => "urgency",
            TodoField::Deadline => "deadline",
            TodoField::Done => "done",
        }
    }

    /// Look a field up by its column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
    /// Substring match on a text column.
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CriterionValue {
    Int(i32),
    Text(String),
    Date(Date),
}

/// One filter condition on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    pub field: TodoField,
    pub op: Operator,
    pub value: CriterionValue,
}

impl Predicate {
    pub fn new(field: TodoField, op: Operator, value: CriterionValue) -> Self {
        Self { field, op, value }
    }
}

/// Conjunction of predicates plus the fixed result order.
///
/// Predicates keep the order they were appended in; the executor binds
/// parameters in that same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
    order: Sort,
}

impl PredicateSet {
    /// An empty set: matches every row, id ascending.
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            order: Sort {
                field: TodoField::Id,
                direction: Direction::Asc,
            },
        }
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> Sort {
        self.order
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Default for PredicateSet {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Filter form
// ---------------------------------------------------------------------------

/// The filter fields exactly as posted from the list screen.
///
/// Codes stay text here so that a non-numeric value is reported against
/// its field instead of failing the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "camelCase"))]
pub struct FilterForm {
    pub title: String,
    pub importance: String,
    pub urgency: String,
    pub deadline_from: String,
    pub deadline_to: String,
    pub done: Option<String>,
}

impl FilterForm {
    /// Bind the form to typed criteria and run [`FilterCriteria::check`].
    ///
    /// A blank code means [`UNCONSTRAINED`].
    pub fn to_criteria(&self) -> Result<FilterCriteria, FieldErrors> {
        let mut errors = FieldErrors::new();
        let importance = bind_code("importance", &self.importance, &mut errors);
        let urgency = bind_code("urgency", &self.urgency, &mut errors);

        let criteria = FilterCriteria {
            title: self.title.clone(),
            importance,
            urgency,
            deadline_from: self.deadline_from.clone(),
            deadline_to: self.deadline_to.clone(),
            done: self.done.clone(),
        };
        if let Err(more) = criteria.check() {
            errors.extend(more);
        }

        if errors.is_empty() {
            Ok(criteria)
        } else {
            Err(errors)
        }
    }
}

impl From<&FilterCriteria> for FilterForm {
    fn from(criteria: &FilterCriteria) -> Self {
        let code = |value: i32| {
            if value == UNCONSTRAINED {
                String::new()
            } else {
                value.to_string()
            }
        };
        Self {
            title: criteria.title.clone(),
            importance: code(criteria.importance),
            urgency: code(criteria.urgency),
            deadline_from: criteria.deadline_from.clone(),
            deadline_to: criteria.deadline_to.clone(),
            done: criteria.done.clone(),
        }
    }
}

/// Unparseable codes are reported and bound as [`UNCONSTRAINED`].
fn bind_code(field: &str, raw: &str, errors: &mut FieldErrors) -> i32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNCONSTRAINED;
    }
    raw.parse().unwrap_or_else(|_| {
        errors.push(field, "number", "must be a number");
        UNCONSTRAINED
    })
}

/// Query-by-example filter in typed form.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct FilterCriteria {
    pub title: String,
    pub importance: i32,
    pub urgency: i32,
    #[validate(custom(function = "validate_optional_date"))]
    pub deadline_from: String,
    #[validate(custom(function = "validate_optional_date"))]
    pub deadline_to: String,
    pub done: Option<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            title: String::new(),
            importance: UNCONSTRAINED,
            urgency: UNCONSTRAINED,
            deadline_from: String::new(),
            deadline_to: String::new(),
            done: None,
        }
    }
}

impl FilterCriteria {
    /// Check the submitted filter.
    ///
    /// Codes must be [`UNCONSTRAINED`] or valid codes, dates must parse, and
    /// a deadline range may not be inverted.
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        for (name, value) in [("importance", self.importance), ("urgency", self.urgency)] {
            if value != UNCONSTRAINED && !is_valid_code(value) {
                errors.push(
                    name,
                    "range",
                    format!("must be {UNCONSTRAINED} or between 0 and {MAX_CODE}"),
                );
            }
        }

        let from = parse_optional_date(&self.deadline_from).ok().flatten();
        let to = parse_optional_date(&self.deadline_to).ok().flatten();
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                errors.push(
                    "deadline_from",
                    "range",
                    "must not be after the end of the deadline range",
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Translate the filter into a predicate set.
    ///
    /// Fails with [`CoreError::Validation`] when a deadline bound is not a
    /// valid date or a code is neither the sentinel nor in range.
    pub fn to_predicates(&self) -> Result<PredicateSet, CoreError> {
        let mut set = PredicateSet::new();

        set.push(Predicate::new(
            TodoField::Title,
            Operator::Contains,
            CriterionValue::Text(self.title.clone()),
        ));

        for (field, value) in [
            (TodoField::Importance, self.importance),
            (TodoField::Urgency, self.urgency),
        ] {
            if value == UNCONSTRAINED {
                continue;
            }
            if !is_valid_code(value) {
                return Err(CoreError::Validation(format!(
                    "{} must be {UNCONSTRAINED} or between 0 and {MAX_CODE}",
                    field.column()
                )));
            }
            set.push(Predicate::new(field, Operator::Eq, CriterionValue::Int(value)));
        }

        if let Some(from) = parse_optional_date(&self.deadline_from)? {
            set.push(Predicate::new(
                TodoField::Deadline,
                Operator::Gte,
                CriterionValue::Date(from),
            ));
        }

        if let Some(to) = parse_optional_date(&self.deadline_to)? {
            set.push(Predicate::new(
                TodoField::Deadline,
                Operator::Lte,
                CriterionValue::Date(to),
            ));
        }

        // Only the done marker filters; "N" is accepted and ignored.
        if self.done.as_deref() == Some(DONE) {
            set.push(Predicate::new(
                TodoField::Done,
                Operator::Eq,
                CriterionValue::Text(DONE.to_string()),
            ));
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::todo::NOT_DONE;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unconstrained_criteria_yield_only_blank_title_match() {
        let set = FilterCriteria::default().to_predicates().unwrap();
        assert_eq!(
            set.predicates(),
            &[Predicate::new(
                TodoField::Title,
                Operator::Contains,
                CriterionValue::Text(String::new())
            )]
        );
        assert_eq!(set.order(), Sort::by_id());
    }

    #[test]
    fn every_active_field_adds_one_predicate_in_order() {
        let criteria = FilterCriteria {
            title: "report".into(),
            importance: 1,
            urgency: 0,
            deadline_from: "2026-01-01".into(),
            deadline_to: "2026-06-30".into(),
            done: Some(DONE.into()),
        };
        let set = criteria.to_predicates().unwrap();
        let fields: Vec<_> = set.predicates().iter().map(|p| (p.field, p.op)).collect();
        assert_eq!(
            fields,
            vec![
                (TodoField::Title, Operator::Contains),
                (TodoField::Importance, Operator::Eq),
                (TodoField::Urgency, Operator::Eq),
                (TodoField::Deadline, Operator::Gte),
                (TodoField::Deadline, Operator::Lte),
                (TodoField::Done, Operator::Eq),
            ]
        );
        assert_eq!(set.predicates()[3].value, CriterionValue::Date(date(2026, 1, 1)));
        assert_eq!(set.predicates()[4].value, CriterionValue::Date(date(2026, 6, 30)));
    }

    #[test]
    fn not_done_marker_is_ignored() {
        let criteria = FilterCriteria {
            done: Some(NOT_DONE.into()),
            ..Default::default()
        };
        let set = criteria.to_predicates().unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn malformed_date_is_a_validation_error() {
        let criteria = FilterCriteria {
            deadline_to: "tomorrow".into(),
            ..Default::default()
        };
        assert_matches!(criteria.to_predicates(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn out_of_range_code_is_a_validation_error() {
        let criteria = FilterCriteria {
            urgency: 9,
            ..Default::default()
        };
        assert_matches!(criteria.to_predicates(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn check_reports_inverted_range() {
        let criteria = FilterCriteria {
            deadline_from: "2026-05-01".into(),
            deadline_to: "2026-04-01".into(),
            ..Default::default()
        };
        let errors = criteria.check().unwrap_err();
        assert!(errors.has("deadline_from"));
    }

    #[test]
    fn check_reports_bad_codes_and_dates() {
        let criteria = FilterCriteria {
            importance: 5,
            deadline_from: "01-05-2026".into(),
            ..Default::default()
        };
        let errors = criteria.check().unwrap_err();
        assert!(errors.has("importance"));
        assert!(errors.has("deadline_from"));
        assert!(FilterCriteria::default().check().is_ok());
    }

    #[test]
    fn field_names_round_trip_through_columns() {
        for field in TodoField::ALL {
            assert_eq!(TodoField::from_name(field.column()), Some(field));
        }
        assert_eq!(TodoField::from_name("created_at"), None);
    }

    #[test]
    fn blank_form_codes_bind_as_unconstrained() {
        let form = FilterForm {
            title: "a".into(),
            urgency: " 1 ".into(),
            ..Default::default()
        };
        let criteria = form.to_criteria().unwrap();
        assert_eq!(criteria.importance, UNCONSTRAINED);
        assert_eq!(criteria.urgency, 1);
        assert_eq!(criteria.deadline_from, "");
    }

    #[test]
    fn non_numeric_code_is_a_field_error() {
        let form = FilterForm {
            importance: "abc".into(),
            urgency: "7".into(),
            deadline_to: "soon".into(),
            ..Default::default()
        };
        let errors = form.to_criteria().unwrap_err();
        let reported: Vec<_> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.code.as_str()))
            .collect();
        assert!(reported.contains(&("importance", "number")));
        assert!(reported.contains(&("urgency", "range")));
        assert!(reported.contains(&("deadline_to", "date")));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn form_round_trips_through_criteria() {
        let criteria = FilterCriteria {
            title: "tax".into(),
            importance: 2,
            ..Default::default()
        };
        let form = FilterForm::from(&criteria);
        assert_eq!(form.importance, "2");
        assert_eq!(form.urgency, "");
        assert_eq!(form.to_criteria().unwrap(), criteria);
    }

    #[test]
    fn form_renders_camel_case_keys() {
        let json = serde_json::to_value(FilterForm::default()).unwrap();
        assert_eq!(json["deadlineFrom"], "");
        assert!(json.get("deadline_from").is_none());
    }
}
