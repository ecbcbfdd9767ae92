//! The metrics context every reporting component shares.

use crate::error::TelemetryError;
use crate::labels::{CallDirection, CallType, STATUS_HEALTHY, STATUS_UNHEALTHY};
use crate::registry::MeshMetrics;
use crate::tally::{CallStats, CallTally};
use crate::timer::CallTimer;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// Summary returned to the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingResults {
    #[serde(with = "time::serde::rfc3339")]
    pub boot_time: OffsetDateTime,
    pub received: CallStats,
}

/// Owns the registry, the collectors, the internal tally and the boot marker
/// for one reporting instance.
///
/// Build one in the composition root and share it behind an `Arc`. Every
/// method takes `&self` and is safe to call from any number of tasks.
pub struct Stats {
    instance: String,
    registry: Registry,
    metrics: MeshMetrics,
    tally: CallTally,
    boot_time: OffsetDateTime,
    boot_instant: Instant,
}

impl std::fmt::Debug for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stats")
            .field("instance", &self.instance)
            .field("boot_time", &self.boot_time)
            .field("received", &self.tally.snapshot(CallDirection::Received))
            .field("made", &self.tally.snapshot(CallDirection::Made))
            .finish_non_exhaustive()
    }
}

impl Stats {
    /// Creates a context with its own fresh registry.
    pub fn new(instance: impl Into<String>) -> Result<Self, TelemetryError> {
        Self::with_registry(instance, Registry::new())
    }

    /// Creates a context whose collectors live in `registry`.
    ///
    /// Fails if the meshping collectors are already registered there.
    pub fn with_registry(
        instance: impl Into<String>,
        registry: Registry,
    ) -> Result<Self, TelemetryError> {
        let instance = instance.into();
        let metrics = MeshMetrics::register(&registry).map_err(TelemetryError::Registration)?;
        let stats = Self {
            instance,
            registry,
            metrics,
            tally: CallTally::new(),
            boot_time: OffsetDateTime::now_utc(),
            boot_instant: Instant::now(),
        };
        tracing::info!(
            target: "telemetry",
            instance = %stats.instance,
            path = "/metrics",
            "metrics registered"
        );
        Ok(stats)
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn boot_time(&self) -> OffsetDateTime {
        self.boot_time
    }

    pub fn uptime(&self) -> Duration {
        self.boot_instant.elapsed()
    }

    /// Counts one call in both the exported counter and the internal tally.
    pub fn record_call(&self, direction: CallDirection, call_type: CallType) {
        self.tally.increment(direction, call_type);
        self.metrics
            .calls
            .with_label_values(&[
                self.instance.as_str(),
                direction.as_str(),
                call_type.as_str(),
            ])
            .inc();
    }

    /// Overwrites the healthy/unhealthy node gauges with the latest view.
    pub fn record_node_health(&self, healthy: u64, unhealthy: u64) {
        self.metrics
            .nodes_health
            .with_label_values(&[self.instance.as_str(), STATUS_HEALTHY])
            .set(healthy as f64);
        self.metrics
            .nodes_health
            .with_label_values(&[self.instance.as_str(), STATUS_UNHEALTHY])
            .set(unhealthy as f64);
    }

    /// Counts one error of the given type.
    ///
    /// Every distinct `error_type` becomes a new series; see
    /// [`crate::labels::error_types`] for the expected vocabulary.
    pub fn record_error(&self, error_type: &str) {
        self.metrics
            .errors
            .with_label_values(&[self.instance.as_str(), error_type])
            .inc();
    }

    /// Starts timing a call to a peer instance.
    pub fn start_peer_timer(
        &self,
        call_type: CallType,
        host_ip: &str,
        pod_ip: &str,
    ) -> CallTimer {
        CallTimer::new(self.metrics.peers_response_time.with_label_values(&[
            self.instance.as_str(),
            call_type.as_str(),
            host_ip,
            pod_ip,
        ]))
    }

    /// Starts timing a list call against the control-plane API.
    pub fn start_control_plane_timer(&self) -> CallTimer {
        CallTimer::new(
            self.metrics
                .kube_master_response_time
                .with_label_values(&[self.instance.as_str()]),
        )
    }

    /// Number of calls recorded so far for one direction and type.
    pub fn calls(&self, direction: CallDirection, call_type: CallType) -> u64 {
        self.tally.get(direction, call_type)
    }

    /// Snapshot of received calls and the boot marker.
    pub fn get_stats(&self) -> PingResults {
        PingResults {
            boot_time: self.boot_time,
            received: self.tally.snapshot(CallDirection::Received),
        }
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<(String, String), TelemetryError> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buf)
            .map_err(TelemetryError::Encode)?;
        Ok((
            encoder.format_type().to_string(),
            String::from_utf8_lossy(&buf).into_owned(),
        ))
    }
}
