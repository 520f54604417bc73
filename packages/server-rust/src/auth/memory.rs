//! In-memory [`AuthProvider`] implementation backed by [`DashMap`].
//!
//! Sessions are opaque bearer tokens mapped to `(User, Session)` pairs.
//! The provider owns its own user projection -- identity records live with
//! the auth collaborator, not with the server. Stands in for the external
//! auth service in tests and the demo binary.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use serde_json::json;
use uuid::Uuid;
use vantage_core::{Session, User};

use crate::traits::{AuthError, AuthProvider};

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "vantage.session_token";

/// In-memory auth provider keyed by opaque session token.
pub struct MemoryAuthProvider {
    sessions: DashMap<String, (User, Session)>,
}

impl MemoryAuthProvider {
    /// Creates a provider with no active sessions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Issues a session for `user` valid for `ttl`, returning the opaque
    /// token the client presents in a bearer header or session cookie.
    pub fn issue_session(&self, user: User, ttl: Duration) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            expires_at: Utc::now() + ttl,
        };
        self.sessions.insert(token.clone(), (user, session));
        token
    }

    /// Revokes the session behind `token`, if any.
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Number of live (possibly expired, not yet swept) sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn lookup(&self, headers: &HeaderMap) -> Option<(User, Session)> {
        let token = extract_token(headers)?;
        let entry = self.sessions.get(&token)?;
        let (user, session) = entry.value().clone();
        drop(entry);

        if session.is_expired(Utc::now()) {
            self.sessions.remove(&token);
            return None;
        }
        Some((user, session))
    }
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn resolve_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<(User, Session)>, AuthError> {
        Ok(self.lookup(headers))
    }

    /// Minimal auth surface for requests delegated from `/api/auth/*`.
    ///
    /// `GET /api/auth/get-session` returns the resolved `{user, session}`
    /// pair, or JSON `null` when the request carries no valid session.
    /// Unknown sub-paths get the canonical 404 body.
    async fn handle(&self, request: Request<Body>) -> Response {
        let path = request.uri().path();
        if request.method() == Method::GET && path == "/api/auth/get-session" {
            return match self.lookup(request.headers()) {
                Some((user, session)) => {
                    Json(json!({ "user": user, "session": session })).into_response()
                }
                None => Json(serde_json::Value::Null).into_response(),
            };
        }

        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Not Found", "status": 404 })),
        )
            .into_response()
    }
}

/// Pulls the session token from `Authorization: Bearer` or the session cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: "a@example.com".to_string(),
            name: "Ada".to_string(),
        }
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        headers
    }

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("theme=dark; {SESSION_COOKIE}={token}")
                .parse()
                .unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn resolves_bearer_token() {
        let provider = MemoryAuthProvider::new();
        let token = provider.issue_session(user(), Duration::hours(1));

        let resolved = provider
            .resolve_session(&bearer_headers(&token))
            .await
            .unwrap();
        let (u, s) = resolved.unwrap();
        assert_eq!(u.id, "u-1");
        assert_eq!(s.user_id, "u-1");
    }

    #[tokio::test]
    async fn resolves_session_cookie() {
        let provider = MemoryAuthProvider::new();
        let token = provider.issue_session(user(), Duration::hours(1));

        let resolved = provider
            .resolve_session(&cookie_headers(&token))
            .await
            .unwrap();
        assert!(resolved.is_some());
    }

    #[tokio::test]
    async fn no_headers_resolves_to_none() {
        let provider = MemoryAuthProvider::new();
        let resolved = provider.resolve_session(&HeaderMap::new()).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let provider = MemoryAuthProvider::new();
        let resolved = provider
            .resolve_session(&bearer_headers("no-such-token"))
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn expired_session_resolves_to_none_and_is_swept() {
        let provider = MemoryAuthProvider::new();
        let token = provider.issue_session(user(), Duration::seconds(-1));

        let resolved = provider
            .resolve_session(&bearer_headers(&token))
            .await
            .unwrap();
        assert!(resolved.is_none());
        assert_eq!(provider.session_count(), 0);
    }

    #[tokio::test]
    async fn revoked_token_resolves_to_none() {
        let provider = MemoryAuthProvider::new();
        let token = provider.issue_session(user(), Duration::hours(1));
        provider.revoke(&token);

        let resolved = provider
            .resolve_session(&bearer_headers(&token))
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn get_session_endpoint_returns_pair() {
        let provider = MemoryAuthProvider::new();
        let token = provider.issue_session(user(), Duration::hours(1));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/auth/get-session")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = provider.handle(request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_auth_subpath_is_404() {
        let provider = MemoryAuthProvider::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/sign-in")
            .body(Body::empty())
            .unwrap();

        let response = provider.handle(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
