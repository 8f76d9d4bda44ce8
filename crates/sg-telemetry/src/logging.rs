//! Global subscriber setup.
//!
//! In JSON mode each line carries `timestamp`, `level`, `target`,
//! `threadId`, source location and the event fields, including the
//! `subsystem` field added by [`log_event!`](crate::log_event).

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| TelemetryError::Config(format!("{}: {e}", config.log_level))),
    }
}

/// Install the process-wide subscriber.
///
/// `RUST_LOG` wins over `config.log_level`. Errors if another global
/// subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;

    let (json, pretty) = if config.is_json() {
        let layer = fmt::layer()
            .json()
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), None)
    } else {
        (None, Some(fmt::layer().with_ansi(true)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.full_service_name(),
        network = %config.network,
        format = ?config.format,
        "logging ready"
    );
    Ok(())
}

/// Debug-level output routed through the test harness writer. Repeated
/// calls are no-ops.
pub fn init_test_logging() {
    let config = TelemetryConfig::for_testing();
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// `tracing` event tagged with a `subsystem` field.
///
/// ```rust,ignore
/// log_event!(warn, "sg-02", "commitment rejected", round = 7u64);
/// ```
///
/// The first argument is any `tracing` level macro name (`trace`, `debug`,
/// `info`, `warn`, `error`).
#[macro_export]
macro_rules! log_event {
    ($level:ident, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        ::tracing::$level!(subsystem = $subsystem, $($($field)*,)? $msg)
    };
}
