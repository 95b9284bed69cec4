use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use atrium::router::init_router;
use atrium::state::init_app_state;
use atrium_config::AppConfig;
use atrium_observability::{
    init_basic_console_logging, init_metrics, init_tracing, is_observability_enabled,
    metrics_app, shutdown_tracer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if is_observability_enabled() {
        init_tracing();
    } else {
        init_basic_console_logging();
    }

    let config = AppConfig::from_env();
    let state = init_app_state(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize application state: {}", e))?;

    if let Some(handle) = init_metrics() {
        let metrics_address = format!("{}:{}", config.server.host, config.server.metrics_port);
        match tokio::net::TcpListener::bind(&metrics_address).await {
            Ok(listener) => {
                info!(address = %metrics_address, "Metrics available at /metrics");
                tokio::spawn(async move {
                    if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                        warn!(error = %e, "Metrics server stopped");
                    }
                });
            }
            Err(e) => warn!(address = %metrics_address, error = %e, "Metrics listener unavailable"),
        }
    }

    let app = init_router(state);
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(address = %address, "Server running");
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}
