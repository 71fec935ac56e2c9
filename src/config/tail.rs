// ABOUTME: Event tailing configuration.
// ABOUTME: Poll interval and how long to drain events after the deployment ends.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TailConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    /// Time the tailer gets to report the final events once the driver is done.
    #[serde(default = "default_drain", with = "humantime_serde")]
    pub drain: Duration,
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_drain() -> Duration {
    Duration::from_secs(10)
}

impl Default for TailConfig {
    fn default() -> Self {
        TailConfig {
            enabled: default_enabled(),
            interval: default_interval(),
            drain: default_drain(),
        }
    }
}
