// ABOUTME: Configuration types and parsing for stackdeploy.yml.
// ABOUTME: Every key is optional; a missing file means the defaults.

mod tail;
mod wait;

pub use tail::TailConfig;
pub use wait::WaitConfig;

use crate::error::{Error, Result};
use crate::types::{Capability, Region};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "stackdeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "stackdeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".stackdeploy/config.yml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub region: Region,

    #[serde(default = "Capability::defaults")]
    pub capabilities: Vec<Capability>,

    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default)]
    pub tail: TailConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            region: Region::default(),
            capabilities: Capability::defaults(),
            wait: WaitConfig::default(),
            tail: TailConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults configuration.
        let config: Option<Config> = serde_yaml::from_str(yaml)?;
        let config = config.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or the defaults if there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("using configuration {}", path.display());
                return Self::load(path);
            }
        }

        Ok(Config::default())
    }

    fn validate(&self) -> Result<()> {
        if self.wait.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "wait.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.wait.interval.is_zero() || self.tail.interval.is_zero() {
            return Err(Error::InvalidConfig(
                "poll intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
