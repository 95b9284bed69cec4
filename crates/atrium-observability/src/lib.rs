//! Logging, tracing and metrics for the Atrium server and CLI.
//!
//! With the `observability` feature (default in the server) this crate wires
//! console, rolling-file and JSON logs, an OTLP trace exporter, per-request
//! logging and Prometheus counters for tenants, users, purchases and session
//! tokens.
//! `OBSERVABILITY_ENABLED=false` turns all of it off at runtime, leaving
//! [`init_basic_console_logging`]. Without the feature every entry point is a
//! no-op stub with the same signature.
//!
//! ```no_run
//! use atrium_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // serve
//!     shutdown_tracer().await;
//! }
//! ```

use std::sync::OnceLock;

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Runtime switch read once from `OBSERVABILITY_ENABLED` (enabled unless
/// `false` or `0`). Always false without the `observability` feature.
pub fn is_observability_enabled() -> bool {
    if !cfg!(feature = "observability") {
        return false;
    }
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use self::logging::{init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use self::metrics::{
    init_metrics, metrics_app, metrics_middleware, track_authorization_denied,
    track_function_invoked, track_organization_created, track_provisioning,
    track_purchase_recorded, track_token_issued, track_token_revoked, track_user_created,
    track_user_login_failure, track_user_login_success,
};

#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Falls back to console logging.
    pub fn init_tracing() {
        crate::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<()> {
        None
    }

    pub fn metrics_app(_handle: ()) -> axum::Router {
        axum::Router::new()
    }

    pub fn track_organization_created() {}
    pub fn track_provisioning(_success: bool) {}
    pub fn track_user_created(_role: &str) {}
    pub fn track_purchase_recorded(_status: &str) {}
    pub fn track_user_login_success(_role: &str) {}
    pub fn track_user_login_failure(_reason: &str) {}
    pub fn track_token_issued() {}
    pub fn track_token_revoked() {}
    pub fn track_authorization_denied(_status: u16) {}
    pub fn track_function_invoked(_function: &str, _status: u16) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
