use std::time::Duration;
use tracing::info;

use crate::config::{parse_env_or, ConfigError};

/// Limits applied to the authentication routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per client in one window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Reads `AUTH_RATE_LIMIT_MAX` (default 10) and
    /// `AUTH_RATE_LIMIT_WINDOW_SECS` (default 900, fifteen minutes).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = RateLimitConfig::default();
        let config = RateLimitConfig {
            max_requests: parse_env_or("AUTH_RATE_LIMIT_MAX", defaults.max_requests)?,
            window_secs: parse_env_or("AUTH_RATE_LIMIT_WINDOW_SECS", defaults.window_secs)?,
        };
        config.validate()?;
        info!(
            max_requests = config.max_requests,
            window_secs = config.window_secs,
            "Auth rate limit configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_requests == 0 {
            return Err(ConfigError::ValidationError(
                "AUTH_RATE_LIMIT_MAX must be greater than 0".to_string(),
            ));
        }
        if self.window_secs == 0 {
            return Err(ConfigError::ValidationError(
                "AUTH_RATE_LIMIT_WINDOW_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            max_requests: 10,
            window_secs: 15 * 60,
        }
    }
}
