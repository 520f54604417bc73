//! HTTP middleware stack for the Vantage server.
//!
//! Builds the Tower middleware pipeline applied to all HTTP requests.
//! Middleware ordering follows the outer-to-inner convention: the first
//! layer listed is the outermost (processes the request first on the way
//! in, and the response last on the way out).

use std::time::Duration;

use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::Method;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::NetworkConfig;
use super::pretty_json::PrettyJsonLayer;
use super::security::SecurityHeadersLayer;

/// Preflight cache lifetime advertised via `access-control-max-age`.
const CORS_MAX_AGE: Duration = Duration::from_secs(600);

/// The composed Tower layer type produced by [`build_http_layers`].
///
/// This type alias keeps the function signature readable. Each layer
/// wraps the next in a `Stack`, from outermost (first applied) to
/// innermost (last applied).
type HttpLayers = tower::layer::util::Stack<
    PrettyJsonLayer,
    tower::layer::util::Stack<
        TimeoutLayer,
        tower::layer::util::Stack<
            CorsLayer,
            tower::layer::util::Stack<
                SecurityHeadersLayer,
                tower::layer::util::Stack<
                    TraceLayer<
                        tower_http::classify::SharedClassifier<
                            tower_http::classify::ServerErrorsAsFailures,
                        >,
                    >,
                    tower::layer::util::Stack<
                        PropagateRequestIdLayer,
                        tower::layer::util::Stack<
                            SetRequestIdLayer<MakeRequestUuid>,
                            tower::layer::util::Identity,
                        >,
                    >,
                >,
            >,
        >,
    >,
>;

/// Builds the HTTP-level Tower middleware stack from the network configuration.
///
/// **Middleware ordering (outermost to innermost):**
/// 1. `SetRequestId` -- assigns a UUID v4 `X-Request-Id` to every incoming request
/// 2. `PropagateRequestId` -- copies `X-Request-Id` onto the response; sits just
///    inside `SetRequestId` so even responses short-circuited by the layers
///    below (CORS preflights, timeouts) carry the id
/// 3. `Tracing` -- logs method, path, status, and latency with structured spans
/// 4. `SecurityHeaders` -- stamps the fixed hardening set on every response,
///    including 404s, timeouts, and errors (response path runs outer-last)
/// 5. `CORS` -- single exact origin, fixed methods and headers, credentials on
/// 6. `Timeout` -- enforces the configured maximum request duration
/// 7. `PrettyJson` -- development-only JSON response formatting
///
/// The session-attach stage is not part of this stack; it needs the shared
/// application state and is added as a router-level `from_fn` middleware.
#[must_use]
pub fn build_http_layers(config: &NetworkConfig) -> HttpLayers {
    let x_request_id = HeaderName::from_static("x-request-id");

    let cors = build_cors_layer(&config.app_base_url);

    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(SecurityHeadersLayer::new(config.environment))
        .layer(cors)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(PrettyJsonLayer::new(config.environment))
        .into_inner()
}

/// Builds the CORS layer for the single configured frontend origin.
///
/// Only an exact origin match receives CORS headers; browsers block
/// cross-origin callers from anywhere else. Credentials are allowed, so
/// the origin, method, and header sets must stay explicit (never `Any`).
fn build_cors_layer(app_base_url: &str) -> CorsLayer {
    let allow_origin = match app_base_url.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        // Unparseable origin: allow nothing rather than everything.
        Err(_) => AllowOrigin::list(Vec::new()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}
