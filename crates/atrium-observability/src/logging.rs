use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::basic_logging::default_filter;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const SERVICE: &str = "atrium";

/// Logs every request with a generated request id, the matched route and the
/// latency. The level follows the status class.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %matched_path,
        "Incoming request"
    );

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    response
}

fn init_tracer() -> Result<Tracer, TraceError> {
    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());

    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, SERVICE),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(
            "environment",
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        ),
    ]);

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

/// Error log plus a JSON log (for Loki and friends), both rotated daily.
fn file_layers(log_dir: &str) -> Result<Vec<BoxedLayer>, tracing_appender::rolling::InitError> {
    let errors = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(SERVICE)
        .filename_suffix("log")
        .build(log_dir)?;
    let json = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(SERVICE)
        .filename_suffix("json")
        .build(log_dir)?;

    Ok(vec![
        fmt::layer()
            .with_writer(errors)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(EnvFilter::new("error"))
            .boxed(),
        fmt::layer()
            .json()
            .with_writer(json)
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(EnvFilter::new("info"))
            .boxed(),
    ])
}

/// Full subscriber: console, rolling files under `LOG_DIR` (default
/// `storage/logs`) and an OTLP exporter when one can be set up.
pub fn init_tracing() {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "storage/logs".to_string());

    let mut layers: Vec<BoxedLayer> = vec![
        fmt::layer()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .compact()
            .with_filter(default_filter())
            .boxed(),
    ];

    let file_status = match file_layers(&log_dir) {
        Ok(file) => {
            layers.extend(file);
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    };

    let tracer_status = match init_tracer() {
        Ok(tracer) => {
            layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    };

    if tracing_subscriber::registry().with(layers).try_init().is_err() {
        return;
    }

    match file_status {
        Ok(()) => info!(log_dir = %log_dir, "File logging enabled"),
        Err(e) => warn!(log_dir = %log_dir, error = %e, "File logging disabled"),
    }
    match tracer_status {
        Ok(()) => info!("Tracing initialized with OpenTelemetry"),
        Err(e) => warn!(error = %e, "OpenTelemetry unavailable, continuing without it"),
    }
}

pub async fn shutdown_tracer() {
    info!("Shutting down OpenTelemetry tracer...");
    global::shutdown_tracer_provider();
}
