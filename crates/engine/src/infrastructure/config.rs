//! Engine configuration from environment variables.

use std::time::Duration;

pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 900;
pub const DEFAULT_SESSION_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a positive number of seconds, got {value:?}")]
    InvalidSeconds { key: &'static str, value: String },
}

/// Runtime knobs for the session registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Sessions with no event for this long are evicted.
    pub session_idle_timeout: Duration,
    /// How often the sweeper looks for idle sessions.
    pub session_sweep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_TIMEOUT_SECS),
            session_sweep_interval: Duration::from_secs(DEFAULT_SESSION_SWEEP_INTERVAL_SECS),
        }
    }
}

impl EngineConfig {
    /// Read `SESSION_IDLE_TIMEOUT_SECS` and `SESSION_SWEEP_INTERVAL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seconds = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            let Some(raw) = lookup(key) else {
                return Ok(Duration::from_secs(default));
            };
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidSeconds { key, value: raw }),
            }
        };

        Ok(Self {
            session_idle_timeout: seconds(
                "SESSION_IDLE_TIMEOUT_SECS",
                DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
            )?,
            session_sweep_interval: seconds(
                "SESSION_SWEEP_INTERVAL_SECS",
                DEFAULT_SESSION_SWEEP_INTERVAL_SECS,
            )?,
        })
    }
}
