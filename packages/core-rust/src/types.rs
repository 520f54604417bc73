//! Identity, session, and per-request context types.
//!
//! `User` and `Session` are read-only projections of records owned by the
//! external auth collaborator and user store. The server never mutates them;
//! it only attaches them to requests and echoes them in responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only projection of an identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier assigned by the user store.
    pub id: String,
    /// Unique email address, the lookup key for `/api/me`.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Read-only projection of a session record.
///
/// The server treats a session as an opaque token of "is authenticated":
/// beyond existence and expiry, no field is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable identifier assigned by the auth collaborator.
    pub id: String,
    /// Identifier of the user this session belongs to.
    pub user_id: String,
    /// Expiry instant; sessions at or past this point resolve as absent.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether this session has expired relative to `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Per-request authentication context attached by the session middleware.
///
/// Invariant: `user` and `session` are set together or not at all. The
/// fields are private and the only constructors are [`AuthContext::authenticated`]
/// and [`AuthContext::anonymous`], so a half-populated context cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user: Option<User>,
    session: Option<Session>,
}

impl AuthContext {
    /// Context for a request with a resolved session.
    #[must_use]
    pub fn authenticated(user: User, session: Session) -> Self {
        Self {
            user: Some(user),
            session: Some(session),
        }
    }

    /// Context for a request with no valid session.
    ///
    /// Both fields are explicitly absent (never "unset") so downstream
    /// handlers can rely on the context being present on every request.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            user: None,
            session: None,
        }
    }

    /// The authenticated user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The resolved session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether this request carries a valid session.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Process-wide runtime mode, read-only after startup.
///
/// Drives the observable environment switches: strict-transport-security is
/// omitted in `Development`, JSON responses are pretty-printed in
/// `Development`, and the `/api/health` body reports the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnv {
    /// Local development: relaxed transport security, readable JSON.
    Development,
    /// Production defaults.
    Production,
}

impl RuntimeEnv {
    /// Whether the process runs in development mode.
    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }

    /// Lowercase name as reported by `/api/health`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: "a@example.com".to_string(),
            name: "Ada".to_string(),
        }
    }

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            id: "s-1".to_string(),
            user_id: "u-1".to_string(),
            expires_at,
        }
    }

    #[test]
    fn anonymous_context_has_neither_field() {
        let ctx = AuthContext::anonymous();
        assert!(ctx.user().is_none());
        assert!(ctx.session().is_none());
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn authenticated_context_has_both_fields() {
        let now = Utc::now();
        let ctx = AuthContext::authenticated(user(), session(now + Duration::hours(1)));
        assert!(ctx.user().is_some());
        assert!(ctx.session().is_some());
        assert!(ctx.is_authenticated());
    }

    #[test]
    fn session_expiry_is_inclusive() {
        let now = Utc::now();
        assert!(session(now).is_expired(now));
        assert!(session(now - Duration::seconds(1)).is_expired(now));
        assert!(!session(now + Duration::seconds(1)).is_expired(now));
    }

    #[test]
    fn runtime_env_reports_mode() {
        assert!(RuntimeEnv::Development.is_development());
        assert!(!RuntimeEnv::Production.is_development());
        assert_eq!(RuntimeEnv::Development.as_str(), "development");
        assert_eq!(RuntimeEnv::Production.as_str(), "production");
    }

    #[test]
    fn user_serializes_with_plain_field_names() {
        let json = serde_json::to_value(user()).unwrap();
        assert_eq!(json["id"], "u-1");
        assert_eq!(json["email"], "a@example.com");
        assert_eq!(json["name"], "Ada");
    }
}
