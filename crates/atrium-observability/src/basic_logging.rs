use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter shared by every subscriber setup: the `LOG_LEVEL` for our own
/// crates, warn for the noisy ones.
pub(crate) fn default_filter() -> EnvFilter {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn,reqwest=warn",
            level = log_level
        ))
    })
}

/// Console-only logging, used when observability is disabled at compile time
/// or with `OBSERVABILITY_ENABLED=false`.
///
/// - **Log Level**: `LOG_LEVEL` (default: "info"), or `RUST_LOG` when set
/// - **Format**: compact, with module targets and source locations
pub fn init_basic_console_logging() {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(default_filter());

    // try_init: tests and the CLI may call this more than once
    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        eprintln!("ℹ️  Observability disabled - console logging only");
    }
}
