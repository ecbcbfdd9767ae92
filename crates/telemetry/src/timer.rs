use prometheus::Histogram;
use std::time::{Duration, Instant};

/// Measures one outbound call and records it into a labeled histogram.
///
/// The observation is made exactly once: either by [`CallTimer::observe_duration`],
/// or when the timer is dropped on whatever path leaves the caller's scope.
/// [`CallTimer::discard`] drops the measurement instead.
#[must_use = "a timer records when it is dropped; bind it to a named variable"]
pub struct CallTimer {
    histogram: Option<Histogram>,
    start: Instant,
}

impl CallTimer {
    pub(crate) fn new(histogram: Histogram) -> Self {
        Self {
            histogram: Some(histogram),
            start: Instant::now(),
        }
    }

    /// A timer bound to no histogram. Useful for sinks that record nothing.
    pub fn detached() -> Self {
        Self {
            histogram: None,
            start: Instant::now(),
        }
    }

    /// Time since the timer was started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stops the timer, records the elapsed seconds and returns them.
    pub fn observe_duration(mut self) -> f64 {
        self.observe()
    }

    /// Stops the timer without recording anything.
    pub fn discard(mut self) {
        self.histogram = None;
    }

    fn observe(&mut self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if let Some(histogram) = self.histogram.take() {
            histogram.observe(secs);
        }
        secs
    }
}

impl std::fmt::Debug for CallTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallTimer")
            .field("armed", &self.histogram.is_some())
            .field("elapsed", &self.start.elapsed())
            .finish()
    }
}

impl Drop for CallTimer {
    fn drop(&mut self) {
        self.observe();
    }
}
