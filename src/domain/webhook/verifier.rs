//! Gateway webhook signature verification.
//!
//! The gateway signs the raw request body with HMAC-SHA512 and sends the
//! hex digest in the `X-Signature` header. Verification runs before any
//! JSON parsing or business logic and compares in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::event::GatewayEvent;
use super::WebhookError;

type HmacSha512 = Hmac<Sha512>;

/// Verifier for gateway webhook signatures.
pub struct WebhookVerifier {
    /// Shared secret from the gateway dashboard.
    secret: String,
}

impl WebhookVerifier {
    /// Creates a new verifier with the given shared secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies the signature over the raw body and parses the event.
    ///
    /// # Verification Steps
    ///
    /// 1. Hex-decode the signature header
    /// 2. Compute HMAC-SHA512 over the raw payload
    /// 3. Compare digests in constant time
    /// 4. Only then parse the JSON payload into a [`GatewayEvent`]
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - digest mismatch or malformed hex
    /// - `ParseError` - payload is not a valid event envelope
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<GatewayEvent, WebhookError> {
        let provided = hex::decode(signature_header.trim())
            .map_err(|_| WebhookError::InvalidSignature)?;

        let expected = self.compute_signature(payload);

        if !constant_time_compare(&expected, &provided) {
            return Err(WebhookError::InvalidSignature);
        }

        let event: GatewayEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        Ok(event)
    }

    /// Computes the HMAC-SHA512 digest of the payload.
    fn compute_signature(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha512::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// Prevents timing attacks that could leak the expected digest.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex signature for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
