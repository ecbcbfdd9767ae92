//! Registry-independent call counts used to build summaries.

use crate::labels::{CallDirection, CallType};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counts for one direction.
#[derive(Debug, Default)]
struct DirectionTally {
    ping: AtomicU64,
    check: AtomicU64,
    check_all: AtomicU64,
}

impl DirectionTally {
    fn slot(&self, call_type: CallType) -> &AtomicU64 {
        match call_type {
            CallType::Ping => &self.ping,
            CallType::Check => &self.check,
            CallType::CheckAll => &self.check_all,
        }
    }

    fn snapshot(&self) -> CallStats {
        CallStats {
            ping: self.ping.load(Ordering::Relaxed),
            check: self.check.load(Ordering::Relaxed),
            check_all: self.check_all.load(Ordering::Relaxed),
        }
    }
}

/// Per-call counts for one direction, as returned in summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStats {
    pub ping: u64,
    pub check: u64,
    pub check_all: u64,
}

/// Monotonic counts for every direction and call type.
///
/// Each cell is its own atomic, so readers see a value that is at worst a
/// little behind, never torn. There is no cross-cell snapshot consistency.
#[derive(Debug, Default)]
pub struct CallTally {
    received: DirectionTally,
    made: DirectionTally,
}

impl CallTally {
    pub fn new() -> Self {
        Self::default()
    }

    fn direction(&self, direction: CallDirection) -> &DirectionTally {
        match direction {
            CallDirection::Received => &self.received,
            CallDirection::Made => &self.made,
        }
    }

    pub fn increment(&self, direction: CallDirection, call_type: CallType) {
        self.direction(direction)
            .slot(call_type)
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, direction: CallDirection, call_type: CallType) -> u64 {
        self.direction(direction)
            .slot(call_type)
            .load(Ordering::Relaxed)
    }

    pub fn snapshot(&self, direction: CallDirection) -> CallStats {
        self.direction(direction).snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_for_every_key() {
        let tally = CallTally::new();
        for d in CallDirection::ALL {
            for t in CallType::ALL {
                assert_eq!(tally.get(d, t), 0, "{d}/{t}");
            }
            assert_eq!(tally.snapshot(d), CallStats::default());
        }
    }

    #[test]
    fn increments_only_the_addressed_cell() {
        let tally = CallTally::new();
        tally.increment(CallDirection::Made, CallType::CheckAll);
        tally.increment(CallDirection::Made, CallType::CheckAll);
        tally.increment(CallDirection::Received, CallType::Ping);

        assert_eq!(tally.get(CallDirection::Made, CallType::CheckAll), 2);
        assert_eq!(tally.get(CallDirection::Received, CallType::Ping), 1);
        assert_eq!(tally.get(CallDirection::Received, CallType::CheckAll), 0);
        assert_eq!(
            tally.snapshot(CallDirection::Made),
            CallStats {
                ping: 0,
                check: 0,
                check_all: 2
            }
        );
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let tally = CallTally::new();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        tally.increment(CallDirection::Received, CallType::Check);
                    }
                });
            }
        });
        assert_eq!(tally.get(CallDirection::Received, CallType::Check), 8000);
    }
}
