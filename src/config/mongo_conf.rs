use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// MongoDB configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username for authentication (optional)
    pub username: Option<String>,
    /// Password for authentication (optional)
    pub password: Option<String>,
    pub users_collection: String,
    pub supervisors_collection: String,
    pub admins_collection: String,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MONGO_URI: MongoDB connection URI (required)
    /// - MONGO_DATABASE: Database name (defaults to edusoft)
    /// - MONGO_USERNAME / MONGO_PASSWORD (optional)
    /// - MONGO_USERS_COLLECTION, MONGO_SUPERVISORS_COLLECTION, MONGO_ADMINS_COLLECTION
    /// - MONGO_POOL_SIZE: Connection pool size (defaults to 10)
    /// - MONGO_CONNECTION_TIMEOUT: Connection timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let uri = env::var("MONGO_URI").map_err(|_| {
            error!("MONGO_URI environment variable not found");
            ConfigError::EnvVarNotFound("MONGO_URI".to_string())
        })?;

        let database = env::var("MONGO_DATABASE").unwrap_or_else(|_| {
            warn!("MONGO_DATABASE not set, using default: edusoft");
            "edusoft".to_string()
        });
        debug!("MongoDB database: {}", database);

        let username = env::var("MONGO_USERNAME").ok();
        let password = env::var("MONGO_PASSWORD").ok();
        if username.is_some() {
            debug!("MongoDB credentials provided");
        }

        let users_collection = env::var("MONGO_USERS_COLLECTION").unwrap_or_else(|_| "users".to_string());
        let supervisors_collection =
            env::var("MONGO_SUPERVISORS_COLLECTION").unwrap_or_else(|_| "supervisors".to_string());
        let admins_collection = env::var("MONGO_ADMINS_COLLECTION").unwrap_or_else(|_| "admins".to_string());

        let pool_size = env::var("MONGO_POOL_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|_| {
                error!("Invalid MONGO_POOL_SIZE value");
                ConfigError::InvalidValue("Invalid MONGO_POOL_SIZE value".to_string())
            })?;

        let connection_timeout_secs = env::var("MONGO_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid MONGO_CONNECTION_TIMEOUT value");
                ConfigError::InvalidValue("Invalid MONGO_CONNECTION_TIMEOUT value".to_string())
            })?;

        let config = MongoConfig {
            uri,
            database,
            username,
            password,
            users_collection,
            supervisors_collection,
            admins_collection,
            pool_size,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uri.is_empty() {
            return Err(ConfigError::ValidationError("MongoDB URI cannot be empty".to_string()));
        }

        if self.database.is_empty() {
            return Err(ConfigError::ValidationError("MongoDB database cannot be empty".to_string()));
        }

        for name in [&self.users_collection, &self.supervisors_collection, &self.admins_collection] {
            if name.is_empty() {
                return Err(ConfigError::ValidationError("MongoDB collection names cannot be empty".to_string()));
            }
        }

        if self.pool_size == 0 {
            return Err(ConfigError::ValidationError("MongoDB pool size must be greater than 0".to_string()));
        }

        if self.connection_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "MongoDB connection timeout must be greater than 0".to_string(),
            ));
        }

        if matches!(self.username.as_deref(), Some("")) || matches!(self.password.as_deref(), Some("")) {
            return Err(ConfigError::ValidationError(
                "MongoDB credentials cannot be empty if set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "edusoft".to_string(),
            username: None,
            password: None,
            users_collection: "users".to_string(),
            supervisors_collection: "supervisors".to_string(),
            admins_collection: "admins".to_string(),
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}
