//! Payment gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Gateway API secret key (bearer credential)
    pub gateway_secret_key: SecretString,

    /// Shared secret for webhook signature verification
    pub webhook_secret: SecretString,

    /// Base URL for the gateway API
    #[serde(default = "default_gateway_base_url")]
    pub gateway_base_url: String,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.gateway_secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_SECRET_KEY"));
        }
        if self.webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("WEBHOOK_SECRET"));
        }
        if production && !self.gateway_base_url.starts_with("https://") {
            return Err(ValidationError::GatewayUrlMustBeHttps);
        }
        Ok(())
    }
}

fn default_gateway_base_url() -> String {
    "https://api.paygate.example".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> PaymentConfig {
        PaymentConfig {
            gateway_secret_key: SecretString::new("sk_test_abc123".to_string()),
            webhook_secret: SecretString::new("whk_secret".to_string()),
            gateway_base_url: base_url.to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config("https://api.paygate.example").validate(true).is_ok());
    }

    #[test]
    fn empty_secret_fails() {
        let cfg = PaymentConfig {
            gateway_secret_key: SecretString::new(String::new()),
            ..config("https://api.paygate.example")
        };
        assert!(cfg.validate(false).is_err());
    }

    #[test]
    fn http_url_rejected_in_production_only() {
        let cfg = config("http://localhost:9000");
        assert!(cfg.validate(true).is_err());
        assert!(cfg.validate(false).is_ok());
    }
}
