//! Configuration for the reporting instance and its telemetry surface.

use crate::error::TelemetryError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Output format of the global log subscriber.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, for local runs.
    Pretty,
}

/// Telemetry settings read at startup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Identity of this instance, attached to every exported series.
    pub hostname: String,
    /// Address the `/metrics`, `/healthz` and `/stats` endpoints bind to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl TelemetryConfig {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            listen_addr: default_listen_addr(),
            log_format: LogFormat::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, TelemetryError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, TelemetryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TelemetryError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Only presence of the hostname is checked; its format is the deployer's concern.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.hostname.trim().is_empty() {
            return Err(TelemetryError::MissingHostname);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = TelemetryConfig::from_toml_str(r#"hostname = "node-a""#).unwrap();
        assert_eq!(cfg, TelemetryConfig::new("node-a"));
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn full_config_parses() {
        let cfg = TelemetryConfig::from_toml_str(
            r#"
            hostname = "node-b"
            listen_addr = "127.0.0.1:9100"
            log_format = "pretty"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.hostname, "node-b");
        assert_eq!(cfg.listen_addr, "127.0.0.1:9100".parse().unwrap());
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn blank_hostname_is_rejected() {
        let err = TelemetryConfig::from_toml_str(r#"hostname = "  ""#).unwrap_err();
        assert!(matches!(err, TelemetryError::MissingHostname));
    }

    #[test]
    fn missing_hostname_is_a_parse_error() {
        let err = TelemetryConfig::from_toml_str(r#"listen_addr = "127.0.0.1:1""#).unwrap_err();
        assert!(matches!(err, TelemetryError::ConfigParse(_)));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let path = Path::new("/nonexistent/meshping.toml");
        let err = TelemetryConfig::load(path).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/meshping.toml"));
    }
}
