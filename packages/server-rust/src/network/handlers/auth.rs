//! Auth passthrough handler.

use axum::extract::{Request, State};
use axum::response::Response;

use super::AppState;

/// `ANY /api/auth/*` -- delegated wholesale to the auth collaborator.
///
/// The server does not inspect these requests; sign-in, sign-out, token
/// refresh, and session introspection are the collaborator's surface.
pub async fn auth_passthrough_handler(State(state): State<AppState>, request: Request) -> Response {
    state.auth.handle(request).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::StatusCode;

    use super::*;
    use crate::auth::MemoryAuthProvider;
    use crate::network::{NetworkConfig, ShutdownController};
    use crate::store::MemoryUserStore;

    #[tokio::test]
    async fn delegates_to_the_provider() {
        let state = AppState {
            auth: Arc::new(MemoryAuthProvider::new()),
            users: Arc::new(MemoryUserStore::new()),
            shutdown: Arc::new(ShutdownController::new()),
            config: Arc::new(NetworkConfig::default()),
        };

        let request = Request::builder()
            .uri("/api/auth/get-session")
            .body(Body::empty())
            .unwrap();

        // No session headers: the provider answers with JSON null, 200.
        let response = auth_passthrough_handler(State(state), request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
