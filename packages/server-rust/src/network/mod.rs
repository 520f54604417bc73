//! Networking: configuration, middleware pipeline, handlers, and shutdown control.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod pretty_json;
pub mod security;
pub mod session;
pub mod shutdown;

pub use config::*;
pub use handlers::AppState;
pub use module::ApiModule;
pub use shutdown::*;
