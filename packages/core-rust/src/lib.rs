//! Vantage Core — identity/session types, path patterns, validation, and wire envelopes.

pub mod envelope;
pub mod pattern;
pub mod types;
pub mod validation;

pub use envelope::{ApiResponse, NotFoundBody, ValidationBody};
pub use pattern::PathPattern;
pub use types::{AuthContext, RuntimeEnv, Session, User};
