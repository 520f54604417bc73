//! Security headers middleware.
//!
//! Applied as the outermost response-mutating stage so the full header set
//! is present on every response -- route hits, the 404 fallback, timeouts,
//! and error responses alike. Strict-transport-security is omitted in
//! development, where requests are plain HTTP.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::http::header::{
    HeaderName, HeaderValue, CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
    X_CONTENT_TYPE_OPTIONS, X_DNS_PREFETCH_CONTROL, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use axum::http::{Request, Response};
use tower::{Layer, Service};
use vantage_core::RuntimeEnv;

/// Self-only sources, with the CDN/script, inline-style, and data/https
/// image and font allowances the frontend needs.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'self'; \
     script-src 'self' https://cdnjs.cloudflare.com; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data: https:; \
     connect-src 'self'; \
     font-src 'self' https: data:; \
     object-src 'none'; \
     media-src 'self'; \
     frame-src 'none'";

/// One year, subdomains included, preload-list eligible.
pub const STRICT_TRANSPORT_SECURITY_VALUE: &str = "max-age=31536000; includeSubDomains; preload";

// Header names the `http` crate has no constants for.
const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");
const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");
const CROSS_ORIGIN_RESOURCE_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-resource-policy");
const ORIGIN_AGENT_CLUSTER: HeaderName = HeaderName::from_static("origin-agent-cluster");
const X_DOWNLOAD_OPTIONS: HeaderName = HeaderName::from_static("x-download-options");
const X_PERMITTED_CROSS_DOMAIN_POLICIES: HeaderName =
    HeaderName::from_static("x-permitted-cross-domain-policies");

// ---------------------------------------------------------------------------
// SecurityHeadersLayer
// ---------------------------------------------------------------------------

/// Tower layer that stamps the fixed security-header set onto every response.
#[derive(Debug, Clone)]
pub struct SecurityHeadersLayer {
    environment: RuntimeEnv,
}

impl SecurityHeadersLayer {
    /// Builds the layer for the given runtime mode.
    #[must_use]
    pub fn new(environment: RuntimeEnv) -> Self {
        Self { environment }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersService {
            inner,
            environment: self.environment,
        }
    }
}

// ---------------------------------------------------------------------------
// SecurityHeadersService
// ---------------------------------------------------------------------------

/// Service wrapper that appends security headers to the response.
#[derive(Debug, Clone)]
pub struct SecurityHeadersService<S> {
    inner: S,
    environment: RuntimeEnv,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for SecurityHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response<ResBody>, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let environment = self.environment;
        let fut = self.inner.call(req);
        Box::pin(async move {
            let mut response = fut.await?;
            apply_security_headers(response.headers_mut(), environment);
            Ok(response)
        })
    }
}

/// Inserts the fixed header set, overriding anything a handler set earlier.
fn apply_security_headers(headers: &mut axum::http::HeaderMap, environment: RuntimeEnv) {
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        CROSS_ORIGIN_EMBEDDER_POLICY,
        HeaderValue::from_static("require-corp"),
    );
    headers.insert(
        CROSS_ORIGIN_OPENER_POLICY,
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        CROSS_ORIGIN_RESOURCE_POLICY,
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(ORIGIN_AGENT_CLUSTER, HeaderValue::from_static("?1"));
    headers.insert(X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off"));
    headers.insert(X_DOWNLOAD_OPTIONS, HeaderValue::from_static("noopen"));
    headers.insert(
        X_PERMITTED_CROSS_DOMAIN_POLICIES,
        HeaderValue::from_static("none"),
    );
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));

    if environment.is_development() {
        // Plain-HTTP development: an HSTS header here would poison the
        // browser's cache for localhost.
        headers.remove(STRICT_TRANSPORT_SECURITY);
    } else {
        headers.insert(
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(STRICT_TRANSPORT_SECURITY_VALUE),
        );
    }
}

/// The header names this stage guarantees on production responses.
#[must_use]
pub fn production_header_names() -> [HeaderName; 13] {
    [
        CONTENT_SECURITY_POLICY,
        X_CONTENT_TYPE_OPTIONS,
        X_FRAME_OPTIONS,
        REFERRER_POLICY,
        CROSS_ORIGIN_EMBEDDER_POLICY,
        CROSS_ORIGIN_OPENER_POLICY,
        CROSS_ORIGIN_RESOURCE_POLICY,
        ORIGIN_AGENT_CLUSTER,
        X_DNS_PREFETCH_CONTROL,
        X_DOWNLOAD_OPTIONS,
        X_PERMITTED_CROSS_DOMAIN_POLICIES,
        X_XSS_PROTECTION,
        STRICT_TRANSPORT_SECURITY,
    ]
}
