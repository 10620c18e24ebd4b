//! HTTP payment gateway adapter.
//!
//! Implements the `PaymentGateway` port against the external payment API:
//! `POST /transaction/initialize` to start a checkout and
//! `GET /transaction/verify/{reference}` to look a charge up. The API
//! credential is a bearer secret handled via `secrecy::SecretString`.

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::Money;
use crate::ports::{
    ChargeStatus, GatewayError, InitializePaymentRequest, InitializedPayment, PaymentGateway,
    VerifiedPayment,
};

/// Gateway API configuration.
#[derive(Clone)]
pub struct GatewayConfig {
    /// API secret key (bearer credential).
    secret_key: SecretString,

    /// Base URL for the gateway API.
    base_url: String,
}

impl GatewayConfig {
    /// Create a new gateway configuration.
    pub fn new(secret_key: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            secret_key,
            base_url: base_url.into(),
        }
    }
}

/// HTTP payment gateway adapter.
pub struct HttpPaymentGateway {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

impl HttpPaymentGateway {
    /// Create a new adapter with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

/// Gateway response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    reference: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    reference: String,
    status: String,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

fn parse_charge_status(s: &str) -> ChargeStatus {
    match s {
        "success" => ChargeStatus::Success,
        "failed" => ChargeStatus::Failed,
        "abandoned" => ChargeStatus::Abandoned,
        _ => ChargeStatus::Pending,
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initialize_payment(
        &self,
        request: InitializePaymentRequest,
    ) -> Result<InitializedPayment, GatewayError> {
        let body = serde_json::json!({
            "email": request.email.as_str(),
            "amount": request.amount.amount(),
            "metadata": request.metadata,
        });

        let response = self
            .http_client
            .post(self.url("transaction/initialize"))
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::authentication("gateway rejected credential"));
        }
        if !response.status().is_success() {
            return Err(GatewayError::provider(format!(
                "initialize returned {}",
                response.status()
            )));
        }

        let envelope: ApiEnvelope<InitializeData> = response
            .json()
            .await
            .map_err(|e| GatewayError::provider(format!("malformed initialize response: {}", e)))?;

        let data = match (envelope.status, envelope.data) {
            (true, Some(data)) => data,
            _ => {
                return Err(GatewayError::provider(
                    envelope
                        .message
                        .unwrap_or_else(|| "initialize rejected".to_string()),
                ))
            }
        };

        Ok(InitializedPayment {
            authorization_url: data.authorization_url,
            reference: data.reference,
        })
    }

    async fn verify_payment(&self, reference: &str) -> Result<VerifiedPayment, GatewayError> {
        let response = self
            .http_client
            .get(self.url(&format!("transaction/verify/{}", reference)))
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::reference_not_found(reference));
        }
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::authentication("gateway rejected credential"));
        }
        if !response.status().is_success() {
            return Err(GatewayError::provider(format!(
                "verify returned {}",
                response.status()
            )));
        }

        let envelope: ApiEnvelope<VerifyData> = response
            .json()
            .await
            .map_err(|e| GatewayError::provider(format!("malformed verify response: {}", e)))?;

        let data = match (envelope.status, envelope.data) {
            (true, Some(data)) => data,
            _ => return Err(GatewayError::reference_not_found(reference)),
        };

        Ok(VerifiedPayment {
            reference: data.reference,
            status: parse_charge_status(&data.status),
            amount: data.amount.map(Money::new),
            metadata: data.metadata,
        })
    }
}
