#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use todolist_api::config::ServerConfig;
use todolist_api::router::build_app_router;
use todolist_api::session::{SessionStore, SESSION_COOKIE};
use todolist_api::state::AppState;
use todolist_core::todo::TodoDraft;
use todolist_db::models::todo::Todo;
use todolist_db::repositories::TodoRepo;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        default_page_size: 2,
        session_idle_timeout_secs: 1800,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// The router owns one session store. Clone it to send several requests
/// that share sessions.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionStore::new()),
    };
    build_app_router(state, &config)
}

/// Send a GET request, optionally carrying a session cookie.
pub async fn get(app: Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Send a url-encoded form POST, optionally carrying a session cookie.
pub async fn post_form(app: Router, uri: &str, body: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Read the response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name=value` pair of the session cookie set by the response, if any.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE}=")))
        .map(str::to_string)
}

/// The redirect target of a response.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .expect("response should redirect")
        .to_str()
        .unwrap()
        .to_string()
}

/// Start a session by visiting the list and return its cookie.
pub async fn open_session(app: &Router) -> String {
    let response = get(app.clone(), "/todo", None).await;
    session_cookie(&response).expect("first visit should set a session cookie")
}

pub fn draft(title: &str, importance: i32, urgency: i32) -> TodoDraft {
    TodoDraft {
        title: title.to_string(),
        importance,
        urgency,
        deadline: None,
        done: "N".to_string(),
    }
}

/// Insert rows directly through the repository, in order.
pub async fn seed(pool: &PgPool, drafts: &[TodoDraft]) -> Vec<Todo> {
    let mut rows = Vec::new();
    for d in drafts {
        rows.push(TodoRepo::create(pool, d).await.unwrap());
    }
    rows
}

/// Five rows with importance alternating 2, 1, 2, 1, 2.
pub async fn seed_alternating(pool: &PgPool) -> Vec<Todo> {
    seed(
        pool,
        &[
            draft("one", 2, 0),
            draft("two", 1, 0),
            draft("three", 2, 1),
            draft("four", 1, 2),
            draft("five", 2, 2),
        ],
    )
    .await
}

/// Ids of the rows in a rendered list view.
pub fn listed_ids(json: &serde_json::Value) -> Vec<i64> {
    json["model"]["todoList"]
        .as_array()
        .expect("todoList should be an array")
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}
