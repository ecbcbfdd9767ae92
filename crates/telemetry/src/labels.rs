//! Fixed label vocabularies shared by the registry and the internal tally.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a probe call was answered by this instance or initiated by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    /// A call this instance answered.
    Received,
    /// A call this instance initiated.
    Made,
}

impl CallDirection {
    /// Every direction, in export order.
    pub const ALL: [CallDirection; 2] = [CallDirection::Received, CallDirection::Made];

    /// The label value written to the `group` label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Made => "made",
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of probe operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    /// Single-hop liveness ping.
    Ping,
    /// Ask one instance to ping all of its peers.
    Check,
    /// Ask every instance to check all of its peers.
    CheckAll,
}

impl CallType {
    /// Every call type, in export order.
    pub const ALL: [CallType; 3] = [CallType::Ping, CallType::Check, CallType::CheckAll];

    /// The label value written to the `action` and `call_type` labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Check => "check",
            Self::CheckAll => "check_all",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `status` label value for peers that answered their last ping.
pub const STATUS_HEALTHY: &str = "healthy";
/// `status` label value for peers that did not.
pub const STATUS_UNHEALTHY: &str = "unhealthy";

/// Well-known values for the `type` label of the error counter.
///
/// The error label is open-ended, but every distinct value becomes its own
/// series. Probing code should stick to these (or another small, fixed set)
/// and never pass addresses, messages or other request-specific text.
pub mod error_types {
    /// A peer ping failed or timed out.
    pub const PING: &str = "ping";
    /// A `check` fan-out to peers failed.
    pub const CHECK: &str = "check";
    /// A `check_all` fan-out failed.
    pub const CHECK_ALL: &str = "check_all";
    /// Listing peer instances from the control-plane API failed.
    pub const KUBERNETES_API: &str = "kubernetes_api";
    /// A peer hostname did not resolve in time.
    pub const DNS_TIMEOUT: &str = "dns_timeout";
}
