//! API module with deferred startup lifecycle.
//!
//! Implements the deferred startup pattern: `new()` creates resources,
//! `start()` binds the TCP listener, and `serve()` starts accepting
//! connections. This separation lets callers learn the bound port (port 0
//! is OS-assigned) before traffic starts, which the tests rely on.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    auth_passthrough_handler, dashboard_handler, favicon_handler, health_handler,
    liveness_handler, me_handler, not_found_handler, readiness_handler, root_handler, AppState,
};
use super::middleware::build_http_layers;
use super::session::attach_session;
use super::shutdown::ShutdownController;
use crate::traits::{AuthProvider, UserStore};

/// How long `serve` waits for in-flight requests after the shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Manages the full HTTP server lifecycle.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- allocates shared state (collaborators, shutdown controller)
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until the shutdown future resolves
pub struct ApiModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    auth: Arc<dyn AuthProvider>,
    users: Arc<dyn UserStore>,
    shutdown: Arc<ShutdownController>,
}

impl ApiModule {
    /// Creates a new API module without binding any port.
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        auth: Arc<dyn AuthProvider>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            config,
            listener: None,
            auth,
            users,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /favicon.ico` -- 204, allow-listed, no auth work
    /// - `ANY /api/auth/{*rest}` -- auth collaborator passthrough
    /// - `GET /api/` -- plaintext greeting
    /// - `GET /api/dashboard` -- redirect to the frontend dashboard
    /// - `GET /api/health` -- `{status, timestamp, env}`
    /// - `GET /api/health/live`, `GET /api/health/ready` -- probes
    /// - `GET /api/me` -- user lookup
    /// - anything else -- canonical 404 JSON
    #[must_use]
    pub fn build_router(&self) -> Router {
        let state = AppState {
            auth: Arc::clone(&self.auth),
            users: Arc::clone(&self.users),
            shutdown: Arc::clone(&self.shutdown),
            config: Arc::new(self.config.clone()),
        };

        let layers = build_http_layers(&self.config);

        Router::new()
            .route("/favicon.ico", get(favicon_handler))
            .route("/api/auth/{*rest}", any(auth_passthrough_handler))
            .route("/api/", get(root_handler))
            .route("/api/dashboard", get(dashboard_handler))
            .route("/api/health", get(health_handler))
            .route("/api/health/live", get(liveness_handler))
            .route("/api/health/ready", get(readiness_handler))
            .route("/api/me", get(me_handler))
            .fallback(not_found_handler)
            // Innermost first: in-flight tracking, then session attach, then
            // the transport stack (request-id, trace, security, CORS, ...).
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                track_in_flight,
            ))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                attach_session,
            ))
            .layer(layers)
            .with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Starts serving connections until the shutdown future resolves.
    ///
    /// After the shutdown signal:
    /// 1. Health state transitions to Draining (readiness probe flips)
    /// 2. Waits up to 30 seconds for in-flight requests to complete
    /// 3. Health state transitions to Stopped
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a fatal I/O error.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .expect("start() must be called before serve()");
        let shutdown_ctrl = Arc::clone(&self.shutdown);
        let tls = self.config.tls.clone();

        shutdown_ctrl.set_ready();

        if let Some(ref tls_config) = tls {
            serve_tls(listener, router, tls_config, shutdown_ctrl, shutdown).await
        } else {
            serve_plain(listener, router, shutdown_ctrl, shutdown).await
        }
    }
}

/// Per-request RAII tracking so graceful shutdown can count in-flight work.
async fn track_in_flight(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let _guard = state.shutdown.in_flight_guard();
    next.run(request).await
}

/// Serves plain HTTP connections using axum's built-in server.
async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown_ctrl: Arc<ShutdownController>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Serving plain HTTP connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    drain_requests(&shutdown_ctrl).await;
    Ok(())
}

/// Serves TLS connections using `axum-server` with rustls.
///
/// Reuses the pre-bound TCP listener by converting it to a `std::net::TcpListener`.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls_config: &super::config::TlsConfig,
    shutdown_ctrl: Arc<ShutdownController>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls_config.cert_path, &tls_config.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(None);
    });

    info!("Serving TLS connections on {}", addr);

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    drain_requests(&shutdown_ctrl).await;
    Ok(())
}

/// Transitions to Draining and waits for in-flight requests to finish.
async fn drain_requests(shutdown_ctrl: &ShutdownController) {
    shutdown_ctrl.trigger_shutdown();

    let drained = shutdown_ctrl.wait_for_drain(DRAIN_TIMEOUT).await;
    if drained {
        info!("All in-flight requests drained");
    } else {
        warn!("Drain timeout expired with in-flight requests remaining");
    }
}
