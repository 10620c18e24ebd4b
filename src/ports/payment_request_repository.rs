//! PaymentRequestRepository port - storage for manual settlement requests.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EmailAddress, PaymentRequestId};
use crate::domain::settlement::CommissionPaymentRequest;

/// Port for persisting manual commission payment requests.
#[async_trait]
pub trait PaymentRequestRepository: Send + Sync {
    /// Persists a newly submitted request.
    async fn save(&self, request: &CommissionPaymentRequest) -> Result<(), DomainError>;

    /// Fetches a request by id.
    async fn find_by_id(
        &self,
        id: &PaymentRequestId,
    ) -> Result<Option<CommissionPaymentRequest>, DomainError>;

    /// Persists the admin decision on an existing request.
    async fn update(&self, request: &CommissionPaymentRequest) -> Result<(), DomainError>;

    /// Requests awaiting verification, oldest first (admin queue).
    async fn list_pending(&self) -> Result<Vec<CommissionPaymentRequest>, DomainError>;

    /// Requests submitted by a provider, newest first.
    async fn list_for_provider(
        &self,
        provider_email: &EmailAddress,
    ) -> Result<Vec<CommissionPaymentRequest>, DomainError>;
}
