use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::response::Response;
use vantage_core::{Session, User};

/// Failure talking to the user store.
///
/// "No matching user" is not an error; it is `Ok(None)` from the query.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not serve the query.
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// Failure inside the auth collaborator.
///
/// An absent or expired session is not an error; it is `Ok(None)` from
/// `resolve_session`. Errors here mean the collaborator itself broke and
/// surface as 500s.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The auth backend could not be reached or misbehaved.
    #[error("auth provider failure: {0}")]
    Provider(String),
}

/// Pluggable user store queried by the `/api/me` handler.
/// Implementations: external database (production), memory (tests, demo).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the first user whose email matches exactly, projecting only
    /// `{id, email, name}`.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// The external auth collaborator: session lookup plus a wholesale request
/// handler mounted under `/api/auth/*`.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the session referenced by the request headers.
    ///
    /// Returns both the user and the session, or `None` when the headers
    /// carry no valid (unexpired) session. This is the soft attach step:
    /// callers must not reject the request on `None`.
    async fn resolve_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<(User, Session)>, AuthError>;

    /// Handle a request delegated wholesale from `/api/auth/*`.
    async fn handle(&self, request: Request<Body>) -> Response;
}
