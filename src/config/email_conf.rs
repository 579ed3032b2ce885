use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, info, warn};

use crate::config::ConfigError;

/// SMTP settings for outgoing account emails
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Empty for unauthenticated relays
    pub smtp_username: String,
    pub smtp_password: String,
    pub use_tls: bool,
    pub use_starttls: bool,
    pub from_email: String,
    /// Display name
    pub from_name: String,
    pub connection_timeout_secs: u64,
}

impl EmailConfig {
    /// Load SMTP settings from the environment.
    ///
    /// Returns `Ok(None)` when `SMTP_HOST` is not set; the application then
    /// logs account links instead of mailing them.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let smtp_host = match env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => host,
            _ => {
                warn!("SMTP_HOST not set, account emails will only be logged");
                return Ok(None);
            }
        };
        info!("Loading email configuration from environment variables");

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("Invalid SMTP_PORT value".to_string()))?;

        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        debug!("SMTP user: {}, password: [REDACTED]", smtp_username);

        let use_tls = parse_flag("SMTP_USE_TLS", true);
        let use_starttls = parse_flag("SMTP_USE_STARTTLS", true);

        let from_email = env::var("SMTP_FROM_EMAIL").map_err(|_| ConfigError::EnvVarNotFound("SMTP_FROM_EMAIL".to_string()))?;
        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "EduSoft".to_string());

        let connection_timeout_secs = env::var("SMTP_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let config = EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            use_tls,
            use_starttls,
            from_email,
            from_name,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("Email configuration loaded successfully");
        Ok(Some(config))
    }

    /// Local mail catcher settings (e.g. MailHog on port 1025)
    pub fn from_test_env() -> Self {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            use_tls: false,
            use_starttls: false,
            from_email: "noreply@edusoft.test".to_string(),
            from_name: "EduSoft Test".to_string(),
            connection_timeout_secs: 10,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_host.is_empty() {
            return Err(ConfigError::ValidationError("SMTP host cannot be empty".to_string()));
        }

        if self.smtp_port == 0 {
            return Err(ConfigError::ValidationError("SMTP port cannot be 0".to_string()));
        }

        if self.smtp_username.is_empty() != self.smtp_password.is_empty() {
            return Err(ConfigError::ValidationError(
                "SMTP username and password must be set together".to_string(),
            ));
        }

        let mut parts = self.from_email.split('@');
        let valid_from = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
        );
        if !valid_from {
            return Err(ConfigError::ValidationError("Invalid from email format".to_string()));
        }

        if self.connection_timeout_secs == 0 {
            return Err(ConfigError::ValidationError("Connection timeout cannot be 0".to_string()));
        }
        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        !self.smtp_username.is_empty()
    }
}

fn parse_flag(var: &str, default: bool) -> bool {
    env::var(var).ok().and_then(|s| s.parse::<bool>().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config() {
        let config = EmailConfig::from_test_env();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
        assert!(!config.use_tls);
        assert!(!config.has_credentials());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = EmailConfig::from_test_env();
        config.smtp_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_half_credentials() {
        let mut config = EmailConfig::from_test_env();
        config.smtp_username = "mailer".to_string();
        assert!(config.validate().is_err());
        config.smtp_password = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_from_email() {
        let mut config = EmailConfig::from_test_env();
        config.from_email = "invalid-email".to_string();
        assert!(config.validate().is_err());
        config.from_email = "a@b@c".to_string();
        assert!(config.validate().is_err());
    }
}
