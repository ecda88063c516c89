//! Handlers for the `/todo` screens.
//!
//! List handlers and the handlers that leave a form apply exactly one
//! [`BrowseState`] transition for the calling session. Opening a form
//! leaves the session untouched; the route decides the form mode.
//!
//! [`BrowseState`]: todolist_core::browse::BrowseState

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use todolist_core::criteria::{FilterCriteria, FilterForm};
use todolist_core::error::CoreError;
use todolist_core::pagination::PageRequest;
use todolist_core::todo::{FormMode, TodoForm};
use todolist_core::types::{Date, DbId};
use todolist_db::repositories::TodoRepo;

use crate::error::{AppError, AppResult};
use crate::session::SessionId;
use crate::state::AppState;
use crate::view::{form_view, list_view, TodoListModel};

/// Paging parameters from the query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl PageParams {
    /// The requested page, or `None` when no paging parameter was sent.
    fn resolve(&self, default: &PageRequest) -> Result<Option<PageRequest>, CoreError> {
        if self.page.is_none() && self.size.is_none() && self.sort.is_none() {
            return Ok(None);
        }
        PageRequest::from_parts(self.page, self.size, self.sort.as_deref(), default).map(Some)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub id: DbId,
}

fn today() -> Date {
    chrono::Utc::now().date_naive()
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Todo", id })
}

/// Consume the session's return target and redirect there.
async fn redirect_back(state: &AppState, session: SessionId) -> Response {
    let target = state
        .sessions
        .update(session, |browse| browse.take_return_target())
        .await;
    Redirect::to(&target.location()).into_response()
}

/// GET /todo
pub async fn list(
    State(state): State<AppState>,
    session: SessionId,
    Query(params): Query<PageParams>,
) -> AppResult<Response> {
    let default = state.config.default_page();
    let requested = params.resolve(&default)?;
    let page = state
        .sessions
        .update(session, |browse| browse.enter_list(requested, default))
        .await;

    let todos = TodoRepo::list_page(&state.pool, &page).await?;
    let query = FilterForm::from(&FilterCriteria::default());
    Ok(list_view(TodoListModel::results(todos, query)).into_response())
}

/// GET /todo/query
pub async fn query_stored(
    State(state): State<AppState>,
    session: SessionId,
    Query(params): Query<PageParams>,
) -> AppResult<Response> {
    let default = state.config.default_page();
    let requested = params.resolve(&default)?;
    let (page, criteria) = state
        .sessions
        .update(session, |browse| browse.enter_query(requested, default))
        .await;

    let predicates = criteria.to_predicates()?;
    let todos = TodoRepo::find_page(&state.pool, &predicates, &page).await?;
    Ok(list_view(TodoListModel::results(todos, FilterForm::from(&criteria))).into_response())
}

/// POST /todo/query
///
/// A rejected filter is re-displayed with its errors; the stored filter
/// stays in effect.
pub async fn query_submit(
    State(state): State<AppState>,
    session: SessionId,
    Query(params): Query<PageParams>,
    Form(form): Form<FilterForm>,
) -> AppResult<Response> {
    let default = state.config.default_page();
    let requested = params.resolve(&default)?;
    let bound = form.to_criteria();

    let page = state
        .sessions
        .update(session, |browse| {
            browse.submit_query(requested, bound.clone().ok(), default)
        })
        .await;

    let criteria = match bound {
        Ok(criteria) => criteria,
        Err(errors) => {
            tracing::debug!(errors = %errors, "Rejected todo filter");
            return Ok(list_view(TodoListModel::rejected(form, errors)).into_response());
        }
    };

    let predicates = criteria.to_predicates()?;
    let todos = TodoRepo::find_page(&state.pool, &predicates, &page).await?;
    Ok(list_view(TodoListModel::results(todos, form)).into_response())
}

/// POST /todo/create/form
pub async fn create_form() -> Response {
    form_view(TodoForm::default(), FormMode::Create, None).into_response()
}

/// POST /todo/create/do
pub async fn create(
    State(state): State<AppState>,
    session: SessionId,
    Form(form): Form<TodoForm>,
) -> AppResult<Response> {
    let draft = match form.to_draft(FormMode::Create, today()) {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(form_view(form, FormMode::Create, Some(errors)).into_response());
        }
    };

    let todo = TodoRepo::create(&state.pool, &draft).await?;
    tracing::info!(todo_id = todo.id, "Todo created");

    Ok(redirect_back(&state, session).await)
}

/// GET /todo/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let todo = TodoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(form_view(todo.to_form(), FormMode::Update, None).into_response())
}

/// POST /todo/update
pub async fn update(
    State(state): State<AppState>,
    session: SessionId,
    Form(form): Form<TodoForm>,
) -> AppResult<Response> {
    let draft = match form.to_draft(FormMode::Update, today()) {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(form_view(form, FormMode::Update, Some(errors)).into_response());
        }
    };
    let id = form
        .id
        .ok_or_else(|| AppError::BadRequest("id is required for an update".into()))?;

    TodoRepo::update(&state.pool, id, &draft)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(todo_id = id, "Todo updated");

    Ok(redirect_back(&state, session).await)
}

/// POST /todo/delete
pub async fn delete(
    State(state): State<AppState>,
    session: SessionId,
    Form(input): Form<DeleteForm>,
) -> AppResult<Response> {
    if !TodoRepo::delete(&state.pool, input.id).await? {
        return Err(not_found(input.id));
    }
    tracing::info!(todo_id = input.id, "Todo deleted");

    Ok(redirect_back(&state, session).await)
}

/// POST /todo/cancel
pub async fn cancel(State(state): State<AppState>, session: SessionId) -> Response {
    redirect_back(&state, session).await
}
