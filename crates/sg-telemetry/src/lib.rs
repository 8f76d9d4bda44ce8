//! # Shard-Guard Telemetry
//!
//! Logging bootstrap shared by the Shard-Guard subsystems.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sg_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::for_subsystem("01", "fork-detection");
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SG_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SG_JSON_LOGS` | `false` | `1`/`true`/`json` selects JSON lines |
//! | `SG_SUBSYSTEM_ID` | `00` | Subsystem identifier |
//! | `SG_NETWORK` | `testnet` | Network name |

mod config;
mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
