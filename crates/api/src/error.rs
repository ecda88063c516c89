use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use todolist_core::error::CoreError;

/// Request-level failure of a `/todo` handler, rendered as
/// `{ "error": <message>, "code": <CODE> }`.
///
/// Field errors on a submitted form are not `AppError`s: those re-render
/// the form view with status 422.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unknown todo id, or a paging or filter value the core rejected.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A form that cannot be acted on, such as an update without an id.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server misconfiguration, e.g. a handler mounted outside the session layer.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// A row that vanished mid-request is a 404. A value rejected by the
/// `todos` CHECK constraints (SQLSTATE `23514`) is a 400 naming the
/// constraint. Anything else is logged and hidden behind a 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Todo not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23514") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Value violates check constraint: {constraint}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_client_statuses() {
        let missing = AppError::Core(CoreError::NotFound { entity: "Todo", id: 7 });
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let invalid = AppError::Core(CoreError::Validation("bad sort".into()));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn vanished_row_is_not_found_and_other_failures_are_hidden() {
        let gone = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(gone.into_response().status(), StatusCode::NOT_FOUND);

        let closed = AppError::Database(sqlx::Error::PoolClosed);
        assert_eq!(
            closed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let misrouted = AppError::InternalError("no session".into());
        assert_eq!(
            misrouted.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
