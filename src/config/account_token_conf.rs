use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info};

use crate::config::ConfigError;

/// Thirty days
pub const MAX_TOKEN_EXPIRATION_SECS: u64 = 30 * 24 * 60 * 60;

/// Settings for email-confirmation and password-reset tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTokenConfig {
    /// Frontend base URL the emailed links point at
    pub frontend_base_url: String,
    /// Path of the email confirmation page (e.g. "/confirm-email")
    pub confirm_path: String,
    /// Path of the password reset page (e.g. "/reset-password")
    pub reset_path: String,
    pub verification_expiration_secs: u64,
    pub reset_expiration_secs: u64,
    /// Random bytes per token; the token itself is hex, twice as long
    pub token_bytes: usize,
}

impl AccountTokenConfig {
    pub fn from_env(frontend_base_url: &str) -> Result<Self, ConfigError> {
        info!("Loading account token configuration from environment variables");

        let confirm_path = env::var("CONFIRM_EMAIL_PATH").unwrap_or_else(|_| "/confirm-email".to_string());
        let reset_path = env::var("RESET_PASSWORD_PATH").unwrap_or_else(|_| "/reset-password".to_string());

        let verification_expiration_secs = parse_secs("EMAIL_VERIFICATION_EXPIRATION", 24 * 60 * 60)?;
        let reset_expiration_secs = parse_secs("RESET_TOKEN_EXPIRATION", 60 * 60)?;

        let token_bytes = env::var("ACCOUNT_TOKEN_BYTES")
            .unwrap_or_else(|_| "32".to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("Invalid ACCOUNT_TOKEN_BYTES value".to_string()))?;

        let config = AccountTokenConfig {
            frontend_base_url: frontend_base_url.to_string(),
            confirm_path,
            reset_path,
            verification_expiration_secs,
            reset_expiration_secs,
            token_bytes,
        };

        config.validate()?;
        debug!(
            "Verification tokens live {}s, reset tokens live {}s",
            config.verification_expiration_secs, config.reset_expiration_secs
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frontend_base_url.starts_with("http://") && !self.frontend_base_url.starts_with("https://") {
            error!("Frontend base URL must start with http:// or https://");
            return Err(ConfigError::ValidationError(
                "Frontend base URL must start with http:// or https://".to_string(),
            ));
        }

        if !self.confirm_path.starts_with('/') || !self.reset_path.starts_with('/') {
            return Err(ConfigError::ValidationError("Frontend paths must start with /".to_string()));
        }

        if self.verification_expiration_secs == 0 || self.reset_expiration_secs == 0 {
            return Err(ConfigError::ValidationError("Token expiration cannot be 0".to_string()));
        }

        if self.verification_expiration_secs > MAX_TOKEN_EXPIRATION_SECS
            || self.reset_expiration_secs > MAX_TOKEN_EXPIRATION_SECS
        {
            return Err(ConfigError::ValidationError(format!(
                "Token expiration cannot exceed {} seconds",
                MAX_TOKEN_EXPIRATION_SECS
            )));
        }

        if self.token_bytes < 16 {
            return Err(ConfigError::ValidationError("Tokens need at least 16 random bytes".to_string()));
        }
        Ok(())
    }

    /// `{base}/confirm-email/{token}`
    pub fn confirmation_url(&self, token: &str) -> String {
        format!("{}{}/{}", self.base(), self.confirm_path.trim_end_matches('/'), token)
    }

    /// `{base}/reset-password?token={token}&type={account_type}`
    pub fn reset_url(&self, token: &str, account_type: &str) -> String {
        format!("{}{}?token={}&type={}", self.base(), self.reset_path, token, account_type)
    }

    fn base(&self) -> &str {
        self.frontend_base_url.trim_end_matches('/')
    }
}

fn parse_secs(var: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue(format!("Invalid {} value", var))),
        Err(_) => Ok(default),
    }
}

impl Default for AccountTokenConfig {
    fn default() -> Self {
        AccountTokenConfig {
            frontend_base_url: "http://localhost:5173".to_string(),
            confirm_path: "/confirm-email".to_string(),
            reset_path: "/reset-password".to_string(),
            verification_expiration_secs: 24 * 60 * 60,
            reset_expiration_secs: 60 * 60,
            token_bytes: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AccountTokenConfig::default();
        assert_eq!(config.verification_expiration_secs, 86400);
        assert_eq!(config.reset_expiration_secs, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_base_url() {
        let mut config = AccountTokenConfig::default();
        config.frontend_base_url = "invalid-url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_path() {
        let mut config = AccountTokenConfig::default();
        config.reset_path = "no-slash".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_short_tokens() {
        let mut config = AccountTokenConfig::default();
        config.token_bytes = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_oversized_expiration() {
        let mut config = AccountTokenConfig::default();
        config.reset_expiration_secs = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = AccountTokenConfig::default();
        config.verification_expiration_secs = MAX_TOKEN_EXPIRATION_SECS + 1;
        assert!(config.validate().is_err());

        config.verification_expiration_secs = MAX_TOKEN_EXPIRATION_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_confirmation_url_with_trailing_slash() {
        let mut config = AccountTokenConfig::default();
        config.frontend_base_url = "http://localhost:5173/".to_string();
        assert_eq!(config.confirmation_url("abc123"), "http://localhost:5173/confirm-email/abc123");
    }

    #[test]
    fn test_reset_url() {
        let config = AccountTokenConfig::default();
        assert_eq!(
            config.reset_url("abc123", "supervisor"),
            "http://localhost:5173/reset-password?token=abc123&type=supervisor"
        );
    }
}
