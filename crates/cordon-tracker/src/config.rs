//! Engine configuration.

use std::error::Error;
use std::fmt;

/// Tunable parameters for [`ZoneEngine`](crate::engine::ZoneEngine).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Minimum seconds between evaluations of one agent.
    ///
    /// The host may call `poll` every frame; agents whose last
    /// evaluation is more recent than this are skipped. Zero
    /// evaluates on every call.
    pub poll_interval_secs: f64,
    /// Capacity of the host event channel. When the host falls this
    /// far behind, further events are dropped with a warning.
    pub event_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 0.25,
            event_capacity: 1024,
        }
    }
}

impl TrackerConfig {
    /// Check the configuration for usable values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.poll_interval_secs.is_finite() || self.poll_interval_secs < 0.0 {
            return Err(ConfigError::InvalidPollInterval {
                value: self.poll_interval_secs,
            });
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::EventCapacityZero);
        }
        Ok(())
    }
}

/// A configuration value the engine cannot run with.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Poll interval must be finite and non-negative.
    InvalidPollInterval {
        /// The offending interval in seconds.
        value: f64,
    },
    /// The event channel needs room for at least one event.
    EventCapacityZero,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPollInterval { value } => {
                write!(f, "poll interval {value} must be finite and non-negative")
            }
            Self::EventCapacityZero => {
                write!(f, "event capacity must be at least 1")
            }
        }
    }
}

impl Error for ConfigError {}
