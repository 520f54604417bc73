//! Network configuration types for the Vantage server.

use std::path::PathBuf;
use std::time::Duration;

use vantage_core::{PathPattern, RuntimeEnv};

/// Top-level network configuration for the server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
    /// Base URL of the frontend application. The single allowed CORS
    /// origin, and the target of the `/api/dashboard` redirect.
    pub app_base_url: String,
    /// Runtime mode; switches HSTS and pretty-JSON behavior.
    pub environment: RuntimeEnv,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
    /// Paths that bypass session resolution entirely.
    pub public_routes: Vec<PathPattern>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            tls: None,
            app_base_url: "http://localhost:3000".to_string(),
            environment: RuntimeEnv::Development,
            request_timeout: Duration::from_secs(30),
            public_routes: vec![PathPattern::parse("/favicon.ico")],
        }
    }
}

/// TLS certificate configuration.
///
/// No `Default` impl because certificate paths have no sensible defaults.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file.
    pub cert_path: PathBuf,
    /// Path to the TLS private key file.
    pub key_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 0);
        assert!(config.tls.is_none());
        assert_eq!(config.app_base_url, "http://localhost:3000");
        assert_eq!(config.environment, RuntimeEnv::Development);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config
            .public_routes
            .iter()
            .any(|p| p.matches("/favicon.ico")));
    }

    #[test]
    fn tls_config_no_default() {
        // TlsConfig intentionally has no Default -- verify manual construction
        let tls = TlsConfig {
            cert_path: PathBuf::from("/tmp/cert.pem"),
            key_path: PathBuf::from("/tmp/key.pem"),
        };
        assert_eq!(tls.cert_path, PathBuf::from("/tmp/cert.pem"));
    }
}
