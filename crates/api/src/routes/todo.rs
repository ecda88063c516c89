//! Route definitions for the to-do screens.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::todo;
use crate::state::AppState;

/// Routes for listing, filtering and editing to-do items.
///
/// ```text
/// GET    /todo                 -> list
/// GET    /todo/query           -> query_stored
/// POST   /todo/query           -> query_submit
/// POST   /todo/create/form     -> create_form
/// POST   /todo/create/do       -> create
/// GET    /todo/{id}            -> show
/// POST   /todo/update          -> update
/// POST   /todo/delete          -> delete
/// POST   /todo/cancel          -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todo", get(todo::list))
        .route(
            "/todo/query",
            get(todo::query_stored).post(todo::query_submit),
        )
        .route("/todo/create/form", post(todo::create_form))
        .route("/todo/create/do", post(todo::create))
        .route("/todo/update", post(todo::update))
        .route("/todo/delete", post(todo::delete))
        .route("/todo/cancel", post(todo::cancel))
        .route("/todo/{id}", get(todo::show))
}
