use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::{debug, error, info};

use crate::config::{parse_env_or, ConfigError};

pub const DEFAULT_LOCAL_URI: &str = "mongodb://127.0.0.1:27017";
pub const DEFAULT_DATABASE: &str = "course_enrollment";

/// Which endpoint the connection URI is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbMode {
    Local,
    Atlas,
}

impl FromStr for DbMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(DbMode::Local),
            "atlas" => Ok(DbMode::Atlas),
            other => Err(ConfigError::InvalidValue(format!(
                "USE_DB must be 'local' or 'atlas', got '{}'",
                other
            ))),
        }
    }
}

/// MongoDB configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Endpoint selector
    pub mode: DbMode,
    /// MongoDB connection URI resolved from the mode
    pub uri: String,
    /// Database name
    pub database: String,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// Expected environment variables:
    /// - USE_DB: `local` or `atlas` (defaults to `local`)
    /// - LOCAL_DB: local connection URI (defaults to `mongodb://127.0.0.1:27017`)
    /// - ATLAS_DB: remote connection URI (required when USE_DB=atlas)
    /// - MONGO_DATABASE: database name (defaults to `course_enrollment`)
    /// - MONGO_POOL_SIZE: connection pool size (defaults to 10)
    /// - MONGO_CONNECTION_TIMEOUT: connection timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let mode = match env::var("USE_DB") {
            Ok(raw) => raw.parse::<DbMode>()?,
            Err(_) => DbMode::Local,
        };
        debug!("MongoDB mode: {:?}", mode);

        let local = env::var("LOCAL_DB").ok();
        let atlas = env::var("ATLAS_DB").ok();
        let uri = Self::select_uri(mode, local, atlas)?;

        let database = env::var("MONGO_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
        debug!("MongoDB database: {}", database);

        let pool_size = parse_env_or::<u32>("MONGO_POOL_SIZE", 10)?;
        let connection_timeout_secs = parse_env_or::<u64>("MONGO_CONNECTION_TIMEOUT", 5)?;

        let config = MongoConfig {
            mode,
            uri,
            database,
            pool_size,
            connection_timeout_secs,
        };

        config.validate()?;
        info!(mode = ?config.mode, database = %config.database, "MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Picks the connection URI for the selected mode.
    ///
    /// Local mode falls back to the default local endpoint. Atlas mode has no
    /// fallback: a missing remote URI is a configuration error.
    pub fn select_uri(
        mode: DbMode,
        local: Option<String>,
        atlas: Option<String>,
    ) -> Result<String, ConfigError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match mode {
            DbMode::Local => Ok(non_empty(local).unwrap_or_else(|| DEFAULT_LOCAL_URI.to_string())),
            DbMode::Atlas => non_empty(atlas).ok_or_else(|| {
                error!("USE_DB=atlas but ATLAS_DB is not set");
                ConfigError::EnvVarNotFound("ATLAS_DB".to_string())
            }),
        }
    }

    /// Create MongoConfig for testing
    pub fn from_test_env() -> Self {
        MongoConfig {
            mode: DbMode::Local,
            uri: DEFAULT_LOCAL_URI.to_string(),
            database: "course_enrollment_test".to_string(),
            pool_size: 2,
            connection_timeout_secs: 2,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uri.trim().is_empty() {
            error!("MongoDB URI is empty");
            return Err(ConfigError::ValidationError("MongoDB URI cannot be empty".to_string()));
        }
        if !(self.uri.starts_with("mongodb://") || self.uri.starts_with("mongodb+srv://")) {
            error!("MongoDB URI has an unsupported scheme");
            return Err(ConfigError::ValidationError(
                "MongoDB URI must start with mongodb:// or mongodb+srv://".to_string(),
            ));
        }
        if self.database.trim().is_empty() {
            error!("MongoDB database is empty");
            return Err(ConfigError::ValidationError("MongoDB database cannot be empty".to_string()));
        }
        if self.pool_size == 0 {
            error!("MongoDB pool size is 0");
            return Err(ConfigError::ValidationError("MongoDB pool size must be greater than 0".to_string()));
        }
        if self.connection_timeout_secs == 0 {
            error!("MongoDB connection timeout is 0");
            return Err(ConfigError::ValidationError(
                "MongoDB connection timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// URI with any `user:password@` credentials masked, for logging.
    pub fn redacted_uri(&self) -> String {
        match (self.uri.find("://"), self.uri.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}***{}", &self.uri[..scheme_end + 3], &self.uri[at..])
            }
            _ => self.uri.clone(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            mode: DbMode::Local,
            uri: DEFAULT_LOCAL_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}
