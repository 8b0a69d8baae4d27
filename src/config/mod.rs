pub mod app_conf;
pub mod jwt_conf;
pub mod mongo_conf;
pub mod rate_limit_conf;

pub use app_conf::AppConfig;
pub use jwt_conf::JwtConfig;
pub use mongo_conf::{DbMode, MongoConfig};
pub use rate_limit_conf::RateLimitConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Reads an optional numeric variable, falling back to `default` when unset.
pub(crate) fn parse_env_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            tracing::error!("Invalid {} value: {}", name, raw);
            ConfigError::InvalidValue(format!("Invalid {} value: {}", name, raw))
        }),
        Err(_) => {
            tracing::debug!("{} not set, using default: {}", name, default);
            Ok(default)
        }
    }
}
