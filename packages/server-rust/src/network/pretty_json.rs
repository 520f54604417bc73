//! Development-only JSON pretty-printing middleware.
//!
//! Purely a response-formatting concern: in development, `application/json`
//! bodies are buffered and re-serialized with indentation so responses are
//! readable in a terminal or browser. Production responses pass through
//! untouched. The body is rewritten, so `content-length` is fixed up to the
//! new size.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Request, Response};
use tower::{Layer, Service};
use tracing::warn;
use vantage_core::RuntimeEnv;

// ---------------------------------------------------------------------------
// PrettyJsonLayer
// ---------------------------------------------------------------------------

/// Tower layer that pretty-prints JSON responses in development.
#[derive(Debug, Clone)]
pub struct PrettyJsonLayer {
    environment: RuntimeEnv,
}

impl PrettyJsonLayer {
    /// Builds the layer for the given runtime mode.
    #[must_use]
    pub fn new(environment: RuntimeEnv) -> Self {
        Self { environment }
    }
}

impl<S> Layer<S> for PrettyJsonLayer {
    type Service = PrettyJsonService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PrettyJsonService {
            inner,
            environment: self.environment,
        }
    }
}

// ---------------------------------------------------------------------------
// PrettyJsonService
// ---------------------------------------------------------------------------

/// Service wrapper that rewrites JSON bodies with `to_vec_pretty`.
#[derive(Debug, Clone)]
pub struct PrettyJsonService<S> {
    inner: S,
    environment: RuntimeEnv,
}

impl<S, ReqBody> Service<Request<ReqBody>> for PrettyJsonService<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>>,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Body>, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let enabled = self.environment.is_development();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let response = fut.await?;
            if !enabled || !is_json(&response) {
                return Ok(response);
            }
            Ok(prettify(response).await)
        })
    }
}

fn is_json(response: &Response<Body>) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Buffers the body and re-serializes it pretty-printed.
///
/// Bodies that fail to buffer or are not valid JSON pass through as-is;
/// formatting must never turn a good response into a bad one.
async fn prettify(response: Response<Body>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, "failed to buffer response body for pretty-printing");
            // The original body is gone; a stale content-length would
            // advertise bytes that never arrive.
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let rendered = match serde_json::from_slice::<serde_json::Value>(&bytes)
        .and_then(|value| serde_json::to_vec_pretty(&value))
    {
        Ok(pretty) => pretty,
        Err(_) => bytes.to_vec(),
    };

    parts
        .headers
        .insert(CONTENT_LENGTH, HeaderValue::from(rendered.len()));
    Response::from_parts(parts, Body::from(rendered))
}
