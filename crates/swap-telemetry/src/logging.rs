//! Subscriber installation and structured swap events.
//!
//! Events carry consistent fields so log pipelines can index them:
//! - `service`: configured service name (on the root span)
//! - `swap_id`: hex swap id
//! - `phase`: persisted phase at the time of the event
//! - additional context fields

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the level filter, preferring `RUST_LOG` style directives from the
/// environment when present.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Filter {
            directive: config.log_level.clone(),
            reason: e.to_string(),
        })
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already set; callers that may initialize twice
/// should ignore [`TelemetryError::SubscriberInit`].
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    if !config.console_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else if config.json_logs {
        // JSON output for log shipping
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else {
        // Pretty output for development
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "logging initialized"
    );
    Ok(())
}

/// Log a swap event with the standard `swap_id` and `phase` fields.
///
/// ```rust,ignore
/// log_swap_event!(info, swap_id, phase, "counterparty lock audited", tx = %tx);
/// ```
#[macro_export]
macro_rules! log_swap_event {
    ($level:ident, $swap_id:expr, $phase:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            swap_id = %$swap_id,
            phase = ?$phase,
            $($($field)*,)?
            $msg
        )
    };
}
