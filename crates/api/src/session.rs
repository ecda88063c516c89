//! Per-client browse sessions.
//!
//! [`attach_session`] makes sure every request carries a session id, read
//! from the `todolist_session` cookie or freshly minted, and handlers reach
//! the matching [`BrowseState`] through [`SessionStore`] with the
//! [`SessionId`] extractor.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{FromRequestParts, Request};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use todolist_core::browse::BrowseState;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "todolist_session";

/// Interval between idle-session sweeps (in seconds).
const REAPER_INTERVAL_SECS: u64 = 60;

/// Identifies one browsing client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

struct SessionEntry {
    state: BrowseState,
    last_seen: Instant,
}

/// In-memory session storage.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Apply one transition to the session's state, creating it on first use.
    ///
    /// Also marks the session as active.
    pub async fn update<F, R>(&self, id: SessionId, apply: F) -> R
    where
        F: FnOnce(&mut BrowseState) -> R,
    {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(id).or_insert_with(|| SessionEntry {
            state: BrowseState::new(),
            last_seen: Instant::now(),
        });
        entry.last_seen = Instant::now();
        apply(&mut entry.state)
    }

    /// Drop every session idle for at least `max_idle`. Returns how many.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < max_idle);
        before - sessions.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a background task that periodically discards idle sessions.
///
/// The returned `JoinHandle` is aborted during shutdown.
pub fn start_session_reaper(
    store: Arc<SessionStore>,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(REAPER_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let removed = store.prune_idle(max_idle).await;
            if removed > 0 {
                let remaining = store.session_count().await;
                tracing::debug!(removed, remaining, "Expired idle sessions");
            }
        }
    })
}

/// Middleware that resolves the session id for every request.
///
/// A missing or malformed cookie gets a new id, returned to the browser via
/// `Set-Cookie`.
pub async fn attach_session(mut request: Request, next: Next) -> Response {
    let (id, fresh) = match session_from_headers(request.headers()) {
        Some(id) => (id, false),
        None => (SessionId(Uuid::new_v4()), true),
    };
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;

    if fresh {
        let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", id.0);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Failed to encode session cookie"),
        }
    }

    response
}

fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(SessionId)
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .copied()
            .ok_or_else(|| AppError::InternalError("Session middleware is not installed".into()))
    }
}
