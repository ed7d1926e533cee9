use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Build the log filter from `RUST_LOG`, or from `fallback` when the variable
/// is missing or invalid.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber: one JSON object per event on stdout.
/// Later calls keep the first subscriber.
pub fn init_tracing(fallback: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(fallback))
        .with(fmt::layer().json().with_current_span(true))
        .try_init();
}
