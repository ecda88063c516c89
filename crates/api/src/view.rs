//! Named views and their models.
//!
//! A [`View`] pairs a template name with a typed model and renders as
//! `{ "view": <name>, "model": {...} }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use todolist_core::criteria::FilterForm;
use todolist_core::pagination::Page;
use todolist_core::todo::{FormMode, TodoForm};
use todolist_core::validation::FieldErrors;
use todolist_db::models::todo::Todo;

/// The paged list with its filter form.
pub const TODO_LIST: &str = "todoList";

/// The entry form, for both creating and editing.
pub const TODO_FORM: &str = "todoForm";

#[derive(Debug)]
pub struct View<M> {
    pub name: &'static str,
    pub status: StatusCode,
    pub model: M,
}

impl<M: Serialize> View<M> {
    pub fn new(name: &'static str, model: M) -> Self {
        Self {
            name,
            status: StatusCode::OK,
            model,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

#[derive(Serialize)]
struct Rendered<'a, M> {
    view: &'a str,
    model: &'a M,
}

impl<M: Serialize> IntoResponse for View<M> {
    fn into_response(self) -> Response {
        let body = Rendered {
            view: self.name,
            model: &self.model,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Model of the [`TODO_LIST`] view.
///
/// `todo_page` and `todo_list` are null when the submitted filter was
/// rejected. `todo_query` holds the filter as the form should show it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListModel {
    pub todo_page: Option<Page<Todo>>,
    pub todo_list: Option<Vec<Todo>>,
    pub todo_query: FilterForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl TodoListModel {
    pub fn results(page: Page<Todo>, query: FilterForm) -> Self {
        Self {
            todo_list: Some(page.content.clone()),
            todo_page: Some(page),
            todo_query: query,
            errors: None,
        }
    }

    pub fn rejected(query: FilterForm, errors: FieldErrors) -> Self {
        Self {
            todo_page: None,
            todo_list: None,
            todo_query: query,
            errors: Some(errors),
        }
    }
}

/// Model of the [`TODO_FORM`] view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFormModel {
    pub todo_data: TodoForm,
    pub mode: FormMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

pub fn list_view(model: TodoListModel) -> View<TodoListModel> {
    let status = if model.errors.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };
    View::new(TODO_LIST, model).with_status(status)
}

pub fn form_view(
    todo_data: TodoForm,
    mode: FormMode,
    errors: Option<FieldErrors>,
) -> View<TodoFormModel> {
    let status = if errors.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };
    View::new(
        TODO_FORM,
        TodoFormModel {
            todo_data,
            mode,
            errors,
        },
    )
    .with_status(status)
}
