//! Error types for the telemetry crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while setting up or exporting meshping telemetry.
///
/// The reporting operations themselves never fail; everything here happens
/// either at startup or on the scrape path.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A collector could not be registered, usually because a metric with the
    /// same name already exists in the registry.
    #[error("Metric registration failed: {0}")]
    Registration(#[source] prometheus::Error),
    /// The registry could not be rendered in the text exposition format.
    #[error("Metric encoding failed: {0}")]
    Encode(#[source] prometheus::Error),
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for [`crate::config::TelemetryConfig`].
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    /// No reporting instance identity was supplied.
    #[error("Reporting instance hostname is missing or blank")]
    MissingHostname,
}
