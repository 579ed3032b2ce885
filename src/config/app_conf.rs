use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::config::ConfigError;

/// Deployment environment, read from `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(ConfigError::InvalidValue(format!("Unknown NODE_ENV: {}", other))),
        }
    }
}

/// Where accounts are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue(format!("Unknown STORAGE_BACKEND: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub frontend_url: String,
    pub storage: StorageBackend,
    pub seed_demo_data: bool,
}

impl AppConfig {
    /// Load application configuration from environment variables
    ///
    /// - APP_HOST (defaults to 0.0.0.0)
    /// - PORT (defaults to 5000)
    /// - NODE_ENV (defaults to production; development must be opted into)
    /// - FRONTEND_URL (defaults to http://localhost:5173)
    /// - STORAGE_BACKEND: mongo | memory (defaults to mongo when MONGO_URI is set)
    /// - SEED_DEMO_DATA (defaults to true, only used by the memory backend)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading application configuration from environment variables");

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue(format!("Invalid PORT value: {}", raw)))?,
            Err(_) => {
                debug!("PORT not set, using default: 5000");
                5000
            }
        };

        let environment = match env::var("NODE_ENV") {
            Ok(raw) => raw.parse()?,
            Err(_) => {
                warn!("NODE_ENV not set, defaulting to production");
                Environment::Production
            }
        };

        let frontend_url = env::var("FRONTEND_URL").unwrap_or_else(|_| {
            warn!("FRONTEND_URL not set, defaulting to http://localhost:5173");
            "http://localhost:5173".to_string()
        });

        let storage = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) if env::var("MONGO_URI").is_ok() => StorageBackend::Mongo,
            Err(_) => {
                warn!("Neither STORAGE_BACKEND nor MONGO_URI set, using the in-memory store");
                StorageBackend::Memory
            }
        };

        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .ok()
            .and_then(|s| s.parse::<bool>().ok())
            .unwrap_or(true);

        let config = AppConfig {
            host,
            port,
            environment,
            frontend_url,
            storage,
            seed_demo_data,
        };
        config.validate()?;
        info!(environment = %config.environment, port = config.port, "Application configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frontend_url.starts_with("http://") && !self.frontend_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(
                "FRONTEND_URL must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            environment: Environment::Test,
            frontend_url: "http://localhost:5173".to_string(),
            storage: StorageBackend::Memory,
            seed_demo_data: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Development".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("mongodb".parse::<StorageBackend>().unwrap(), StorageBackend::Mongo);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_validate_frontend_url() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());
        config.frontend_url = "localhost:5173".to_string();
        assert!(config.validate().is_err());
    }
}
