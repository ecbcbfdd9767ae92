#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # meshping telemetry
//!
//! Instrumentation for the meshping daemon: call statistics, node health
//! gauges, peer and control-plane response-time histograms, an internal call
//! tally for status summaries, and the HTTP surface that exposes them.
//!
//! Everything hangs off one [`Stats`] context per process, built by the
//! composition root and shared behind an `Arc`.

/// Telemetry configuration and its TOML loader.
pub mod config;
/// The crate's error type.
pub mod error;
/// A lightweight HTTP server for `/metrics`, `/healthz` and `/stats`.
pub mod http;
/// The initialization routine for global structured logging.
pub mod init;
/// Call directions, call types and other fixed label values.
pub mod labels;
/// Collector definitions and registration.
pub mod registry;
/// Abstract `ProbeMetricsSink` contract and its no-op implementation.
pub mod sinks;
/// The metrics context shared by every reporting component.
pub mod stats;
/// Per-process call counts independent of the registry.
pub mod tally;
/// Drop-guard timer for outbound calls.
pub mod timer;

pub use config::{LogFormat, TelemetryConfig};
pub use error::TelemetryError;
pub use labels::{CallDirection, CallType};
pub use sinks::{NopSink, ProbeMetricsSink};
pub use stats::{PingResults, Stats};
pub use tally::CallStats;
pub use timer::CallTimer;
