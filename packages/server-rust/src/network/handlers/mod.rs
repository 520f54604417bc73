//! HTTP handler definitions for the Vantage server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod auth;
pub mod health;
pub mod misc;
pub mod user;

pub use auth::auth_passthrough_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use misc::{dashboard_handler, favicon_handler, not_found_handler, root_handler};
pub use user::me_handler;

use std::sync::Arc;

use crate::network::{NetworkConfig, ShutdownController};
use crate::traits::{AuthProvider, UserStore};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap. The
/// collaborators are trait objects: production wires external services,
/// tests wire the in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    /// Auth collaborator: session resolution and the `/api/auth/*` surface.
    pub auth: Arc<dyn AuthProvider>,
    /// User store queried by `/api/me`.
    pub users: Arc<dyn UserStore>,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Network configuration (bind address, origin, environment, allow-list).
    pub config: Arc<NetworkConfig>,
}
