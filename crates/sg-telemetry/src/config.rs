//! Logging settings, read from `SG_*` environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, ANSI colored.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    fn from_flag(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Attached to every log line as `service`.
    pub service_name: String,
    /// Two-digit subsystem tag; `00` means the whole node.
    pub subsystem_id: String,
    /// `EnvFilter` directive, e.g. `info` or `sg_02_slashing=debug`.
    pub log_level: String,
    pub format: LogFormat,
    pub network: String,
}

const WHOLE_NODE: &str = "00";

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "shard-guard".into(),
            subsystem_id: WHOLE_NODE.into(),
            log_level: "info".into(),
            format: LogFormat::Pretty,
            network: "testnet".into(),
        }
    }
}

fn env_or(keys: &[&str], fallback: String) -> String {
    keys.iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.is_empty()))
        .unwrap_or(fallback)
}

impl TelemetryConfig {
    /// Reads `SG_SUBSYSTEM_ID`, `SG_LOG_LEVEL` (falling back to `RUST_LOG`),
    /// `SG_JSON_LOGS` and `SG_NETWORK`. Unset variables keep their defaults.
    pub fn from_env() -> Self {
        let base = Self::default();
        let format = env::var("SG_JSON_LOGS")
            .map(|raw| LogFormat::from_flag(&raw))
            .unwrap_or(base.format);

        Self {
            subsystem_id: env_or(&["SG_SUBSYSTEM_ID"], base.subsystem_id),
            log_level: env_or(&["SG_LOG_LEVEL", "RUST_LOG"], base.log_level),
            network: env_or(&["SG_NETWORK"], base.network),
            format,
            service_name: base.service_name,
        }
    }

    /// Environment settings, tagged for one subsystem (`sg-<id>-<name>`).
    pub fn for_subsystem(id: &str, name: &str) -> Self {
        Self {
            service_name: format!("sg-{id}-{name}"),
            subsystem_id: id.to_owned(),
            ..Self::from_env()
        }
    }

    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".into(),
            network: "devnet".into(),
            ..Self::default()
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == LogFormat::Json
    }

    /// Service label used in log output; the subsystem tag is appended
    /// unless the config covers the whole node.
    pub fn full_service_name(&self) -> String {
        match self.subsystem_id.as_str() {
            WHOLE_NODE => self.service_name.clone(),
            id => format!("{}-{id}", self.service_name),
        }
    }
}
