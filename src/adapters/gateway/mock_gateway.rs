//! Mock payment gateway for testing.
//!
//! Configurable implementation of `PaymentGateway` supporting scripted
//! responses, error injection, and call tracking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    ChargeStatus, GatewayError, InitializePaymentRequest, InitializedPayment, PaymentGateway,
    VerifiedPayment,
};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
/// mock.set_verify_result("stl_1", VerifiedPayment { ... });
///
/// let result = mock.verify_payment("stl_1").await;
/// assert_eq!(mock.initialize_calls(), 0);
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Next initialize response.
    next_initialize: Option<InitializedPayment>,

    /// Verify responses by reference.
    verify_results: HashMap<String, VerifiedPayment>,

    /// Error to return on the next call.
    next_error: Option<GatewayError>,

    /// Recorded initialize requests.
    initialize_log: Vec<InitializePaymentRequest>,

    /// Recorded verify references.
    verify_log: Vec<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next initialize response.
    pub fn set_initialize_result(&self, result: InitializedPayment) {
        self.inner.lock().unwrap().next_initialize = Some(result);
    }

    /// Scripts the verify response for a reference.
    pub fn set_verify_result(&self, reference: impl Into<String>, result: VerifiedPayment) {
        self.inner
            .lock()
            .unwrap()
            .verify_results
            .insert(reference.into(), result);
    }

    /// Injects an error on the next call.
    pub fn set_error(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Number of initialize calls made.
    pub fn initialize_calls(&self) -> usize {
        self.inner.lock().unwrap().initialize_log.len()
    }

    /// Recorded initialize requests.
    pub fn initialize_log(&self) -> Vec<InitializePaymentRequest> {
        self.inner.lock().unwrap().initialize_log.clone()
    }

    /// Recorded verify references.
    pub fn verify_log(&self) -> Vec<String> {
        self.inner.lock().unwrap().verify_log.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn initialize_payment(
        &self,
        request: InitializePaymentRequest,
    ) -> Result<InitializedPayment, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.initialize_log.push(request);

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state.next_initialize.take().ok_or_else(|| {
            GatewayError::provider("mock gateway: no initialize result configured")
        })
    }

    async fn verify_payment(&self, reference: &str) -> Result<VerifiedPayment, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.verify_log.push(reference.to_string());

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state
            .verify_results
            .get(reference)
            .cloned()
            .ok_or_else(|| GatewayError::reference_not_found(reference))
    }
}

/// Helper to build a successful settlement verification.
pub fn settled_payment(
    reference: &str,
    transaction_ids: Vec<String>,
    provider_email: &str,
) -> VerifiedPayment {
    VerifiedPayment {
        reference: reference.to_string(),
        status: ChargeStatus::Success,
        amount: None,
        metadata: Some(serde_json::json!({
            "purpose": "commission_settlement",
            "transaction_ids": transaction_ids,
            "provider_email": provider_email,
        })),
    }
}
