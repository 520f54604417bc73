//! Request-level error taxonomy and its JSON rendering.
//!
//! Handlers return `Result<_, ApiError>`; the `IntoResponse` impl maps each
//! variant to its wire shape. Collaborator failures are logged with their
//! full chain and rendered as a generic 500 so internals never leak to
//! clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;
use vantage_core::envelope::ValidationBody;
use vantage_core::validation::ValidationError;

use crate::traits::{AuthError, StoreError};

/// Errors a route handler can produce.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A request field failed schema validation -- 400 with field detail.
    #[error("validation failed for field `{field}`: {source}")]
    Validation {
        /// Name of the offending request field.
        field: &'static str,
        /// The underlying validation failure.
        source: ValidationError,
    },

    /// No matching entity -- structured 404, never an opaque 500.
    #[error("{0}")]
    NotFound(String),

    /// The auth collaborator failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The user store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Validation failure for a named request field.
    #[must_use]
    pub fn validation(field: &'static str, source: ValidationError) -> Self {
        Self::Validation { field, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation { field, source } => (
                StatusCode::BAD_REQUEST,
                Json(ValidationBody::new(field, source.to_string())),
            )
                .into_response(),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            Self::Auth(_) | Self::Store(_) => {
                // Full detail stays in the logs; clients get a generic body.
                error!(error = %self, "collaborator failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "An unexpected error occurred",
                    })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_naming_the_field() {
        let resp = ApiError::validation("email", ValidationError::InvalidEmail).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = ApiError::NotFound("User not found".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn collaborator_failures_map_to_500() {
        let auth = ApiError::from(AuthError::Provider("down".to_string())).into_response();
        assert_eq!(auth.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let store = ApiError::from(StoreError::Unavailable("down".to_string())).into_response();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
