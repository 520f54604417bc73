//! Session-attach middleware.
//!
//! The soft attach step: every request leaves this stage with an
//! [`AuthContext`] in its extensions, authenticated or anonymous. The stage
//! never rejects a request itself; authorization decisions belong to the
//! individual handlers. Paths on the public-route allow-list skip resolution
//! entirely and carry an anonymous context.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use vantage_core::pattern;
use vantage_core::AuthContext;

use crate::error::ApiError;
use crate::network::handlers::AppState;

/// Resolves the caller's session and attaches the context to the request.
///
/// # Errors
///
/// Propagates [`ApiError::Auth`] when the auth collaborator itself fails;
/// an absent or expired session is not a failure and yields an anonymous
/// context instead.
pub async fn attach_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path();
    if pattern::any_match(&state.config.public_routes, path) {
        request.extensions_mut().insert(AuthContext::anonymous());
        return Ok(next.run(request).await);
    }

    let context = match state.auth.resolve_session(request.headers()).await? {
        Some((user, session)) => AuthContext::authenticated(user, session),
        None => AuthContext::anonymous(),
    };
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
