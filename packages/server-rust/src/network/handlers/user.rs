//! User lookup handler.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use vantage_core::envelope::ApiResponse;
use vantage_core::{validation, AuthContext, Session, User};

use super::AppState;
use crate::error::ApiError;

/// Query parameters for `GET /api/me`.
#[derive(Debug, Deserialize)]
pub struct MeQuery {
    /// Email address to look up. Validated before the store is queried.
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload of a successful `/api/me` response.
#[derive(Debug, Serialize)]
pub struct MeData {
    /// The user matched by the queried email.
    pub user: User,
    /// The caller's session, if the request was authenticated.
    pub session: Option<Session>,
    /// The caller's own user record, if the request was authenticated.
    #[serde(rename = "sessionUser")]
    pub session_user: Option<User>,
}

/// `GET /api/me?email=<addr>` -- look up a user by exact email match.
///
/// The response echoes the caller's own session context alongside the
/// looked-up user. Lookups are not scoped to the authenticated caller:
/// any syntactically valid email can be queried. This matches the
/// upstream behavior and is a known authorization gap.
///
/// # Errors
///
/// - [`ApiError::Validation`] (400) when `email` is missing or malformed
/// - [`ApiError::NotFound`] (404) when no user matches
/// - [`ApiError::Store`] (500) when the user store fails
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<MeQuery>,
) -> Result<Json<ApiResponse<MeData>>, ApiError> {
    let email = query.email.as_deref().unwrap_or_default();
    validation::email(email).map_err(|source| ApiError::validation("email", source))?;

    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let data = MeData {
        user,
        session: context.session().cloned(),
        session_user: context.user().cloned(),
    };
    Ok(Json(ApiResponse::ok(data, "User found successfully")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::auth::MemoryAuthProvider;
    use crate::network::{NetworkConfig, ShutdownController};
    use crate::store::MemoryUserStore;

    fn seeded_state() -> AppState {
        let users = MemoryUserStore::new();
        users.insert(User {
            id: "u-1".to_string(),
            email: "valid@example.com".to_string(),
            name: "Ada".to_string(),
        });
        AppState {
            auth: Arc::new(MemoryAuthProvider::new()),
            users: Arc::new(users),
            shutdown: Arc::new(ShutdownController::new()),
            config: Arc::new(NetworkConfig::default()),
        }
    }

    fn query(email: Option<&str>) -> Query<MeQuery> {
        Query(MeQuery {
            email: email.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn existing_user_returns_envelope_with_projection() {
        let result = me_handler(
            State(seeded_state()),
            Extension(AuthContext::anonymous()),
            query(Some("valid@example.com")),
        )
        .await
        .unwrap();

        let body = result.0;
        assert!(body.success);
        assert_eq!(body.message, "User found successfully");
        assert_eq!(body.data.user.id, "u-1");
        assert_eq!(body.data.user.name, "Ada");
        assert!(body.data.session.is_none());
        assert!(body.data.session_user.is_none());
    }

    #[tokio::test]
    async fn authenticated_caller_context_is_echoed() {
        let caller = User {
            id: "u-2".to_string(),
            email: "caller@example.com".to_string(),
            name: "Caller".to_string(),
        };
        let session = Session {
            id: "s-1".to_string(),
            user_id: "u-2".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };

        // Arbitrary lookup: the caller queries someone else's email and the
        // response carries both records.
        let result = me_handler(
            State(seeded_state()),
            Extension(AuthContext::authenticated(caller, session)),
            query(Some("valid@example.com")),
        )
        .await
        .unwrap();

        let data = result.0.data;
        assert_eq!(data.user.email, "valid@example.com");
        assert_eq!(data.session_user.unwrap().email, "caller@example.com");
        assert_eq!(data.session.unwrap().id, "s-1");
    }

    #[tokio::test]
    async fn unknown_email_is_structured_not_found() {
        let err = me_handler(
            State(seeded_state()),
            Extension(AuthContext::anonymous()),
            query(Some("missing@example.com")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn malformed_email_is_validation_error_naming_the_field() {
        let err = me_handler(
            State(seeded_state()),
            Extension(AuthContext::anonymous()),
            query(Some("not-an-email")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation { field: "email", .. }));
    }

    #[tokio::test]
    async fn missing_email_is_validation_error() {
        let err = me_handler(
            State(seeded_state()),
            Extension(AuthContext::anonymous()),
            query(None),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation { field: "email", .. }));
    }
}
