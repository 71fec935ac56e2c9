// ABOUTME: Completion polling configuration.
// ABOUTME: Interval between status checks and the attempt bound.

use serde::Deserialize;
use std::time::Duration;

use crate::deploy::WaitPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitConfig {
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_interval() -> Duration {
    WaitPolicy::DEFAULT_INTERVAL
}

fn default_max_attempts() -> u32 {
    WaitPolicy::DEFAULT_MAX_ATTEMPTS
}

impl WaitConfig {
    pub fn policy(&self) -> WaitPolicy {
        WaitPolicy {
            interval: self.interval,
            max_attempts: self.max_attempts,
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        WaitConfig {
            interval: default_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}
