//! Structured logging setup
//!
//! The library itself only emits `tracing` events; applications that want
//! them printed call [`init_tracing`] once at startup.

use crate::{
    config::LoggingConfig,
    error::{FastroidError, Result},
};
use tracing::{info, Level, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Build the filter for `config`; `RUST_LOG` takes precedence when set
///
/// # Errors
/// Returns `FastroidError::Configuration` if the configured level is invalid
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    config
        .level
        .parse::<Level>()
        .map_err(|e| FastroidError::configuration(format!("Invalid log level: {e}")))?;

    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)))
}

/// JSON lines layer writing to `make_writer`
fn json_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(make_writer)
}

/// Install the global tracing subscriber
///
/// # Errors
/// Returns `FastroidError::Configuration` if the level is invalid or a global
/// subscriber is already installed
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config)?);

    let installed = if config.json {
        registry.with(json_layer(std::io::stdout)).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE);
        registry.with(fmt_layer).try_init()
    };

    installed.map_err(|e| {
        FastroidError::configuration(format!("Failed to initialize tracing: {e}"))
    })?;

    info!("Tracing initialized with level: {}", config.level);
    Ok(())
}
