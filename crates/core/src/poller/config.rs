//! Poller configuration.

use serde::{Deserialize, Serialize};

/// Configuration for operation polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Delay between a poll response and the next request (milliseconds).
    /// Applies only while the operation reports waiting/processing.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    2000
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}
