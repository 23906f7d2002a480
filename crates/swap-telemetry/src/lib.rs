//! # Swap Telemetry
//!
//! Logging setup for processes that embed the swap engine.
//!
//! The engine itself only emits `tracing` events and spans; this crate
//! installs the subscriber that turns them into console or JSON output.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use swap_telemetry::{init_logging, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_logging(&TelemetryConfig::from_env()).expect("logging");
//!     // run executors and watchers
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SWAP_SERVICE_NAME` | `atomic-swap` | Service name attached to every event |
//! | `SWAP_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SWAP_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `SWAP_CONSOLE_OUTPUT` | `true` | Write events to stdout |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber was already installed or could not be set.
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    /// The log level directive could not be parsed.
    #[error("Invalid log filter '{directive}': {reason}")]
    Filter {
        /// Directive as configured.
        directive: String,
        /// Parser message.
        reason: String,
    },
}
