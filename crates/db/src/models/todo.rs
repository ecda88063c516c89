//! The `todos` entity.

use serde::Serialize;
use sqlx::FromRow;
use todolist_core::todo::{TodoForm, DONE};
use todolist_core::types::{Date, DbId, Timestamp};
use todolist_core::validation::DATE_FORMAT;

/// A row from the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: DbId,
    pub title: String,
    pub importance: i32,
    pub urgency: i32,
    pub deadline: Option<Date>,
    pub done: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Todo {
    pub fn is_done(&self) -> bool {
        self.done == DONE
    }

    /// Pre-fill the entry form with this row's values.
    pub fn to_form(&self) -> TodoForm {
        TodoForm {
            id: Some(self.id),
            title: self.title.clone(),
            importance: self.importance.to_string(),
            urgency: self.urgency.to_string(),
            deadline: self
                .deadline
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            done: Some(self.done.clone()),
        }
    }
}
