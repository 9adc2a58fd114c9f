// packages/sniffer/src/utils/config.rs
//! Sniffer configuration
//!
//! Values are layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. Optional `sniffer.{toml,yaml,json}` in the working directory (or an
//!    explicit file passed to [`SnifferConfig::load_from`])
//! 3. Environment variables, e.g. `SNIFFER__TRANSPORT__REQUEST_TIMEOUT_MS=500`

use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const ENV_PREFIX: &str = "SNIFFER";
const DEFAULT_FILE: &str = "sniffer";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnifferConfig {
    /// Logging setup
    pub log: LogConfig,

    /// What gets captured from intercepted traffic
    pub capture: CaptureConfig,

    /// Real transport settings
    pub transport: TransportConfig,
}

impl SnifferConfig {
    /// Load configuration from the default file (if present) and environment
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(DEFAULT_FILE).required(false))
            .add_source(Self::environment())
            .build()?;

        let config: Self = settings.try_deserialize()?;
        debug!("Loaded sniffer configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration from an explicit file, still honoring environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(true))
            .add_source(Self::environment())
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("capture.redact_headers")
            .try_parsing(true)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Capture configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Header names whose values are masked in captured exchanges
    pub redact_headers: Vec<String>,
}

impl CaptureConfig {
    /// Case-insensitive check against the redaction list
    pub fn is_redacted(&self, name: &str) -> bool {
        self.redact_headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Real transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Upper bound for a whole request/response round trip
    pub request_timeout_ms: u64,

    /// How long idle pooled connections are kept
    pub pool_idle_timeout_ms: u64,
}

impl TransportConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.pool_idle_timeout_ms)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            pool_idle_timeout_ms: 90_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SnifferConfig::default();
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
        assert!(config.capture.redact_headers.is_empty());
        assert_eq!(config.transport.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[log]
json = true

[capture]
redact_headers = ["Authorization", "cookie"]

[transport]
request_timeout_ms = 250
"#
        )
        .unwrap();

        let config = SnifferConfig::load_from(file.path()).unwrap();
        assert!(config.log.json);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.transport.request_timeout_ms, 250);
        assert_eq!(config.transport.pool_idle_timeout_ms, 90_000);
        assert!(config.capture.is_redacted("authorization"));
        assert!(config.capture.is_redacted("Cookie"));
        assert!(!config.capture.is_redacted("content-type"));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = SnifferConfig::load_from("/nonexistent/sniffer.toml");
        assert!(matches!(
            result,
            Err(crate::utils::errors::SnifferError::ConfigError(_))
        ));
    }
}
