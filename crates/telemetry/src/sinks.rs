//! The reporting contract probing code depends on, decoupled from the backend.

use crate::labels::{CallDirection, CallType};
use crate::stats::Stats;
use crate::timer::CallTimer;

/// A sink for probe call, node health, error and response-time metrics.
pub trait ProbeMetricsSink: Send + Sync + std::fmt::Debug {
    /// Counts one call received or made.
    fn record_call(&self, direction: CallDirection, call_type: CallType);
    /// Sets the number of peer nodes currently seen as healthy and unhealthy.
    fn record_node_health(&self, healthy: u64, unhealthy: u64);
    /// Counts one error of the given type.
    fn record_error(&self, error_type: &str);
    /// Starts timing a call to a peer; the returned timer records on close or drop.
    fn start_peer_timer(&self, call_type: CallType, host_ip: &str, pod_ip: &str) -> CallTimer;
    /// Starts timing a control-plane list call.
    fn start_control_plane_timer(&self) -> CallTimer;
}

impl ProbeMetricsSink for Stats {
    fn record_call(&self, direction: CallDirection, call_type: CallType) {
        Stats::record_call(self, direction, call_type);
    }
    fn record_node_health(&self, healthy: u64, unhealthy: u64) {
        Stats::record_node_health(self, healthy, unhealthy);
    }
    fn record_error(&self, error_type: &str) {
        Stats::record_error(self, error_type);
    }
    fn start_peer_timer(&self, call_type: CallType, host_ip: &str, pod_ip: &str) -> CallTimer {
        Stats::start_peer_timer(self, call_type, host_ip, pod_ip)
    }
    fn start_control_plane_timer(&self) -> CallTimer {
        Stats::start_control_plane_timer(self)
    }
}

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopSink;

impl ProbeMetricsSink for NopSink {
    fn record_call(&self, _direction: CallDirection, _call_type: CallType) {}
    fn record_node_health(&self, _healthy: u64, _unhealthy: u64) {}
    fn record_error(&self, _error_type: &str) {}
    fn start_peer_timer(&self, _call_type: CallType, _host_ip: &str, _pod_ip: &str) -> CallTimer {
        CallTimer::detached()
    }
    fn start_control_plane_timer(&self) -> CallTimer {
        CallTimer::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn probe_once(sink: &dyn ProbeMetricsSink) {
        sink.record_call(CallDirection::Made, CallType::Ping);
        let timer = sink.start_peer_timer(CallType::Ping, "10.0.0.2", "10.244.0.9");
        timer.observe_duration();
        sink.record_node_health(4, 0);
    }

    #[test]
    fn stats_behind_trait_object() {
        let stats = Arc::new(Stats::new("node-b").unwrap());
        let sink: Arc<dyn ProbeMetricsSink> = stats.clone();
        probe_once(sink.as_ref());
        assert_eq!(stats.calls(CallDirection::Made, CallType::Ping), 1);
        assert_eq!(stats.calls(CallDirection::Received, CallType::Ping), 0);
    }

    #[test]
    fn nop_sink_accepts_everything() {
        probe_once(&NopSink);
        NopSink.record_error("anything");
        NopSink.start_control_plane_timer().discard();
    }
}
