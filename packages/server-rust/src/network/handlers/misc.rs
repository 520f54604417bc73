//! Small static handlers: greeting, favicon, dashboard redirect, 404 fallback.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use vantage_core::envelope::NotFoundBody;

use super::AppState;

/// `GET /api/` -- plaintext greeting.
pub async fn root_handler() -> &'static str {
    "Hello, Universe!"
}

/// `GET /favicon.ico` -- empty success, short-circuits before any auth
/// work (the path sits on the public-route allow-list).
pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// `GET /api/dashboard` -- redirect to the frontend dashboard.
pub async fn dashboard_handler(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&format!("{}/dashboard", state.config.app_base_url))
}

/// Fallback for unmatched routes: the canonical 404 JSON body.
pub async fn not_found_handler() -> (StatusCode, Json<NotFoundBody>) {
    (StatusCode::NOT_FOUND, Json(NotFoundBody::default()))
}
