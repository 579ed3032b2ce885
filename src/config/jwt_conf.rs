use rand::{distributions::Alphanumeric, Rng};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

const MIN_SECRET_LEN: usize = 32;
/// One year
pub const MAX_TOKEN_EXPIRATION_MINUTES: i64 = 365 * 24 * 60;

/// JWT configuration structure
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub jwt_secret: String,
    /// Access token expiration time in minutes
    pub access_token_expiration: i64,
    /// Refresh token expiration time in minutes
    pub refresh_token_expiration: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for signing JWT tokens (required)
    /// - JWT_ACCESS_TOKEN_EXPIRY: Access token expiration in minutes (defaults to 1440 = 24h)
    /// - JWT_REFRESH_TOKEN_EXPIRY: Refresh token expiration in minutes (defaults to 10080 = 1 week)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            error!("JWT_SECRET environment variable not found");
            ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
        })?;
        debug!("JWT secret loaded (length: {} chars)", jwt_secret.len());

        let access_token_expiration = parse_minutes("JWT_ACCESS_TOKEN_EXPIRY", 1440)?;
        let refresh_token_expiration = parse_minutes("JWT_REFRESH_TOKEN_EXPIRY", 10080)?;

        let config = JwtConfig {
            jwt_secret,
            access_token_expiration,
            refresh_token_expiration,
        };
        config.validate()?;

        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    /// Configuration with a random per-process secret, for local development
    /// when JWT_SECRET is not provided. Tokens do not survive a restart.
    pub fn development() -> Self {
        warn!("Using a random development JWT secret; issued tokens are invalidated on restart");
        let jwt_secret: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();
        JwtConfig {
            jwt_secret,
            ..JwtConfig::default()
        }
    }

    /// Validate the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("Validating JWT configuration");

        if self.jwt_secret.len() < MIN_SECRET_LEN {
            error!("JWT secret is too short (minimum {} characters required)", MIN_SECRET_LEN);
            return Err(ConfigError::ValidationError(format!(
                "JWT secret must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }

        if self.access_token_expiration <= 0 {
            return Err(ConfigError::ValidationError(
                "Access token expiration must be greater than 0".to_string(),
            ));
        }

        if self.refresh_token_expiration <= 0 {
            return Err(ConfigError::ValidationError(
                "Refresh token expiration must be greater than 0".to_string(),
            ));
        }

        if self.access_token_expiration > MAX_TOKEN_EXPIRATION_MINUTES
            || self.refresh_token_expiration > MAX_TOKEN_EXPIRATION_MINUTES
        {
            return Err(ConfigError::ValidationError(format!(
                "Token expiration cannot exceed {} minutes",
                MAX_TOKEN_EXPIRATION_MINUTES
            )));
        }

        if self.access_token_expiration >= self.refresh_token_expiration {
            warn!("Access token expiration is greater than or equal to refresh token expiration");
        }

        Ok(())
    }
}

fn parse_minutes(var: &str, default: i64) -> Result<i64, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.parse::<i64>().map_err(|e| {
            error!("Invalid {} value: {}", var, e);
            ConfigError::InvalidValue(format!("{}: {}", var, e))
        }),
        Err(_) => {
            debug!("{} not set, using default: {} minutes", var, default);
            Ok(default)
        }
    }
}

/// Create JWT configuration for testing with default values
impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security_purposes".to_string(),
            access_token_expiration: 1440,
            refresh_token_expiration: 10080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(JwtConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = JwtConfig {
            jwt_secret: "your-secret-key".to_string(),
            ..JwtConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_expiration_rejected() {
        let config = JwtConfig {
            access_token_expiration: 0,
            ..JwtConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_expiration_rejected() {
        let config = JwtConfig {
            refresh_token_expiration: i64::MAX,
            ..JwtConfig::default()
        };
        assert!(config.validate().is_err());

        let config = JwtConfig {
            access_token_expiration: MAX_TOKEN_EXPIRATION_MINUTES + 1,
            refresh_token_expiration: MAX_TOKEN_EXPIRATION_MINUTES + 2,
            ..JwtConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_development_secret_is_random() {
        let a = JwtConfig::development();
        let b = JwtConfig::development();
        assert!(a.validate().is_ok());
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }
}
