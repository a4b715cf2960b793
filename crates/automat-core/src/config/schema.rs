//! Configuration schema. Durations are written in seconds in the YAML
//! file and exposed as `Duration` through same-named accessor methods.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatConfig {
    pub web: WebConfig,
    pub desktop: DesktopConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Default resolution timeout in seconds.
    pub timeout: f64,
    /// Default settle delay in seconds applied before mutating actions.
    pub differ: f64,
    /// Poll interval in seconds used while waiting for a handle.
    pub poll: f64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            timeout: 30.0,
            differ: 0.0,
            poll: 0.25,
        }
    }
}

impl WebConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    pub fn differ(&self) -> Duration {
        Duration::from_secs_f64(self.differ)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_secs_f64(self.poll)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub timeout: f64,
    pub differ: f64,
    pub poll: f64,
    /// Image template matching confidence, 0.0..=1.0.
    pub confidence: f32,
    /// Compare templates in grayscale instead of color.
    pub grayscale: bool,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            timeout: 60.0,
            differ: 0.0,
            poll: 0.5,
            confidence: 0.9,
            grayscale: true,
        }
    }
}

impl DesktopConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    pub fn differ(&self) -> Duration {
        Duration::from_secs_f64(self.differ)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_secs_f64(self.poll)
    }
}
