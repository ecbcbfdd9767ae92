//! The fixed set of meshping collectors and their registration.

use prometheus::core::Collector;
use prometheus::{CounterVec, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry};

/// Label carrying the reporting instance on every series.
pub const INSTANCE_LABEL: &str = "meshping_instance";

/// Bucket upper bounds, in seconds, for both response-time histograms.
pub const RESPONSE_TIME_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

pub const STATS_TOTAL: &str = "meshping_stats_total";
pub const NODES_HEALTH_TOTAL: &str = "meshping_nodes_health_total";
pub const PEERS_RESPONSE_TIME: &str = "meshping_peers_response_time_s";
pub const KUBE_MASTER_RESPONSE_TIME: &str = "meshping_kube_master_response_time_s";
pub const ERRORS_TOTAL: &str = "meshping_errors_total";

/// Handles to every registered collector.
///
/// Cloning is cheap: each vector is an `Arc` around the shared series map, so a
/// clone still writes into the same registry.
#[derive(Clone, Debug)]
pub struct MeshMetrics {
    pub(crate) calls: CounterVec,
    pub(crate) nodes_health: GaugeVec,
    pub(crate) peers_response_time: HistogramVec,
    pub(crate) kube_master_response_time: HistogramVec,
    pub(crate) errors: CounterVec,
}

impl MeshMetrics {
    /// Creates all five collectors and registers them with `registry`.
    ///
    /// Fails with `AlreadyReg` if any of the names is already taken. Callers
    /// treat that as a startup error. Registration is all or nothing: on
    /// failure the collectors registered so far are removed again, so the
    /// registry is left as it was found.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let metrics = Self {
            calls: CounterVec::new(
                Opts::new(STATS_TOTAL, "Statistics of calls made in meshping instances"),
                &[INSTANCE_LABEL, "group", "action"],
            )?,
            nodes_health: GaugeVec::new(
                Opts::new(
                    NODES_HEALTH_TOTAL,
                    "Number of nodes seen as healthy/unhealthy from this instance's POV",
                ),
                &[INSTANCE_LABEL, "status"],
            )?,
            peers_response_time: HistogramVec::new(
                HistogramOpts::new(
                    PEERS_RESPONSE_TIME,
                    "Histogram of response times from other hosts, when making peer calls",
                )
                .buckets(RESPONSE_TIME_BUCKETS.to_vec()),
                &[INSTANCE_LABEL, "call_type", "host_ip", "pod_ip"],
            )?,
            kube_master_response_time: HistogramVec::new(
                HistogramOpts::new(
                    KUBE_MASTER_RESPONSE_TIME,
                    "Histogram of response times from kubernetes API server, when listing other instances",
                )
                .buckets(RESPONSE_TIME_BUCKETS.to_vec()),
                &[INSTANCE_LABEL],
            )?,
            errors: CounterVec::new(
                Opts::new(ERRORS_TOTAL, "Statistics of errors per instance"),
                &[INSTANCE_LABEL, "type"],
            )?,
        };

        for (done, collector) in metrics.collectors().into_iter().enumerate() {
            if let Err(e) = registry.register(collector) {
                for registered in metrics.collectors().into_iter().take(done) {
                    if let Err(undo) = registry.unregister(registered) {
                        tracing::warn!(target: "telemetry", error = %undo, "Failed to roll back collector");
                    }
                }
                return Err(e);
            }
        }
        Ok(metrics)
    }

    fn collectors(&self) -> Vec<Box<dyn Collector>> {
        vec![
            Box::new(self.calls.clone()),
            Box::new(self.nodes_health.clone()),
            Box::new(self.peers_response_time.clone()),
            Box::new(self.kube_master_response_time.clone()),
            Box::new(self.errors.clone()),
        ]
    }
}

/// Adds the standard `process_*` collector (CPU, RSS, open fds, start time).
#[cfg(target_os = "linux")]
pub fn register_process_collector(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))
}

/// Process metrics are only collected on Linux.
#[cfg(not(target_os = "linux"))]
pub fn register_process_collector(_registry: &Registry) -> Result<(), prometheus::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_all_families() {
        let registry = Registry::new();
        let metrics = MeshMetrics::register(&registry).unwrap();
        // Vectors only show up in `gather` once a series exists.
        metrics.calls.with_label_values(&["a", "received", "ping"]).inc();
        metrics.nodes_health.with_label_values(&["a", "healthy"]).set(1.0);
        metrics
            .peers_response_time
            .with_label_values(&["a", "ping", "10.0.0.1", "10.1.0.1"])
            .observe(0.01);
        metrics.kube_master_response_time.with_label_values(&["a"]).observe(0.01);
        metrics.errors.with_label_values(&["a", "ping"]).inc();

        let mut names: Vec<_> = registry
            .gather()
            .iter()
            .map(|mf| mf.get_name().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            [
                ERRORS_TOTAL,
                KUBE_MASTER_RESPONSE_TIME,
                NODES_HEALTH_TOTAL,
                PEERS_RESPONSE_TIME,
                STATS_TOTAL,
            ]
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = Registry::new();
        MeshMetrics::register(&registry).unwrap();
        let err = MeshMetrics::register(&registry).unwrap_err();
        assert!(matches!(err, prometheus::Error::AlreadyReg), "got {err:?}");
    }

    #[test]
    fn failed_registration_leaves_registry_untouched() {
        let registry = Registry::new();
        // Occupy the third name so the first two register before the failure.
        let blocker = MeshMetrics::register(&Registry::new())
            .unwrap()
            .peers_response_time;
        registry.register(Box::new(blocker.clone())).unwrap();

        let err = MeshMetrics::register(&registry).unwrap_err();
        assert!(matches!(err, prometheus::Error::AlreadyReg), "got {err:?}");

        // Had the call and health collectors stayed behind, this would fail too.
        registry.unregister(Box::new(blocker)).unwrap();
        assert!(MeshMetrics::register(&registry).is_ok());
    }

    #[test]
    fn separate_registries_do_not_collide() {
        assert!(MeshMetrics::register(&Registry::new()).is_ok());
        assert!(MeshMetrics::register(&Registry::new()).is_ok());
    }

    #[test]
    fn buckets_are_sorted() {
        assert!(RESPONSE_TIME_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }
}
