//! Vantage API server binary.
//!
//! Wires environment/flag configuration into the network module, installs
//! the tracing subscriber, and serves until SIGTERM or Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vantage_core::{PathPattern, RuntimeEnv, User};
use vantage_server::auth::MemoryAuthProvider;
use vantage_server::network::{ApiModule, NetworkConfig, TlsConfig};
use vantage_server::store::MemoryUserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EnvArg {
    Development,
    Production,
}

impl From<EnvArg> for RuntimeEnv {
    fn from(value: EnvArg) -> Self {
        match value {
            EnvArg::Development => Self::Development,
            EnvArg::Production => Self::Production,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "vantage-server", about = "Vantage HTTP API server")]
struct Cli {
    /// Bind address.
    #[arg(long, env = "VANTAGE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 for OS-assigned).
    #[arg(long, env = "VANTAGE_PORT", default_value_t = 8787)]
    port: u16,

    /// Frontend base URL: the allowed CORS origin and redirect target.
    #[arg(long, env = "APP_BASE_URL", default_value = "http://localhost:3000")]
    app_base_url: String,

    /// Runtime mode.
    #[arg(long, env = "VANTAGE_ENV", value_enum, default_value_t = EnvArg::Development)]
    environment: EnvArg,

    /// Per-request timeout in seconds.
    #[arg(long, env = "VANTAGE_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Additional public-route patterns (exact path, or prefix ending in `*`).
    #[arg(long = "public-route", env = "VANTAGE_PUBLIC_ROUTES", value_delimiter = ',')]
    public_routes: Vec<String>,

    /// TLS certificate path (PEM). TLS is enabled when both paths are set.
    #[arg(long, env = "VANTAGE_TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    /// TLS private key path (PEM).
    #[arg(long, env = "VANTAGE_TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

impl Cli {
    fn network_config(&self) -> NetworkConfig {
        let mut public_routes = vec![PathPattern::parse("/favicon.ico")];
        public_routes.extend(self.public_routes.iter().map(|p| PathPattern::parse(p)));

        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            }),
            _ => None,
        };

        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            tls,
            app_base_url: self.app_base_url.clone(),
            environment: self.environment.into(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            public_routes,
        }
    }
}

fn init_tracing(environment: RuntimeEnv) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if environment.is_development() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let environment: RuntimeEnv = cli.environment.into();
    init_tracing(environment);

    let config = cli.network_config();

    let users = Arc::new(MemoryUserStore::new());
    let auth = Arc::new(MemoryAuthProvider::new());

    if environment.is_development() {
        // Demo fixtures so /api/me and the session flow work out of the box.
        let demo = User {
            id: "u-demo".to_string(),
            email: "demo@example.com".to_string(),
            name: "Demo User".to_string(),
        };
        users.insert(demo.clone());
        let token = auth.issue_session(demo, chrono::Duration::hours(24));
        info!(%token, "development session issued for demo@example.com");
    }

    let mut module = ApiModule::new(config, auth, users);
    let port = module.start().await?;
    info!(port, env = environment.as_str(), "vantage-server listening");

    module.serve(shutdown_signal()).await
}
