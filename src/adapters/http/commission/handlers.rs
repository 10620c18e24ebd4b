//! HTTP handlers for the commission endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::commission::{
    GetOutstandingHandler, GetOutstandingQuery, IngestGatewayWebhookHandler,
    IngestWebhookCommand, InitializeCommissionPaymentCommand,
    InitializeCommissionPaymentHandler, MarkOverdueHandler, RecordBookingPaymentCommand,
    RecordBookingPaymentHandler, SubmitManualPaymentCommand, SubmitManualPaymentHandler,
    VerificationDecision, VerifyCommissionPaymentCommand, VerifyCommissionPaymentHandler,
    VerifyManualPaymentCommand, VerifyManualPaymentHandler, VerifyPaymentOutcome,
};
use crate::domain::commission::{
    CommissionError, PaymentMethod, ProviderTier, RateTable, ServiceType,
};
use crate::domain::foundation::{EmailAddress, Money};
use crate::ports::{
    AuditLog, OutstandingReader, PaymentGateway, PaymentRequestRepository, ProcessedEventStore,
    TransactionLedger,
};

use super::dto::{
    ErrorResponse, InitializePaymentRequestDto, InitializePaymentResponse,
    OutstandingResponse, PaymentRequestResponse, RecordPaymentRequest,
    SubmitManualPaymentRequestDto, SweepResponse, TransactionResponse,
    VerifyManualPaymentRequestDto, VerifyPaymentRequestDto, VerifyPaymentResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; dependencies are Arc-wrapped ports.
#[derive(Clone)]
pub struct CommissionAppState {
    pub ledger: Arc<dyn TransactionLedger>,
    pub payment_requests: Arc<dyn PaymentRequestRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub outstanding_reader: Arc<dyn OutstandingReader>,
    pub processed_events: Arc<dyn ProcessedEventStore>,
    pub audit_log: Arc<dyn AuditLog>,
    /// Shared secret for webhook signature verification.
    pub webhook_secret: String,
    /// Commission rate table from configuration.
    pub rate_table: RateTable,
    /// Days before outstanding commission is overdue.
    pub overdue_threshold_days: i64,
}

impl CommissionAppState {
    /// Create handlers on demand from the shared state.
    pub fn record_payment_handler(&self) -> RecordBookingPaymentHandler {
        RecordBookingPaymentHandler::new(self.ledger.clone(), self.rate_table)
    }

    pub fn webhook_handler(&self) -> IngestGatewayWebhookHandler {
        IngestGatewayWebhookHandler::new(
            self.ledger.clone(),
            self.processed_events.clone(),
            self.webhook_secret.clone(),
        )
    }

    pub fn initialize_payment_handler(&self) -> InitializeCommissionPaymentHandler {
        InitializeCommissionPaymentHandler::new(self.ledger.clone(), self.gateway.clone())
    }

    pub fn verify_payment_handler(&self) -> VerifyCommissionPaymentHandler {
        VerifyCommissionPaymentHandler::new(
            self.ledger.clone(),
            self.gateway.clone(),
            self.processed_events.clone(),
        )
    }

    pub fn submit_manual_payment_handler(&self) -> SubmitManualPaymentHandler {
        SubmitManualPaymentHandler::new(self.ledger.clone(), self.payment_requests.clone())
    }

    pub fn verify_manual_payment_handler(&self) -> VerifyManualPaymentHandler {
        VerifyManualPaymentHandler::new(
            self.ledger.clone(),
            self.payment_requests.clone(),
            self.audit_log.clone(),
            self.overdue_threshold_days,
        )
    }

    pub fn outstanding_handler(&self) -> GetOutstandingHandler {
        GetOutstandingHandler::new(
            self.ledger.clone(),
            self.outstanding_reader.clone(),
            self.overdue_threshold_days,
        )
    }

    pub fn mark_overdue_handler(&self) -> MarkOverdueHandler {
        MarkOverdueHandler::new(self.ledger.clone(), self.overdue_threshold_days)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Authenticated principals (extracted by the session layer upstream;
// carried on headers here, matching the development auth setup)
// ════════════════════════════════════════════════════════════════════════════════

/// Provider principal extracted from the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedProvider {
    pub email: EmailAddress,
}

/// Admin principal extracted from the request.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub username: String,
}

/// Rejection for missing/invalid principal headers.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedProvider
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let email = parts
                .headers
                .get("X-Provider-Email")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| EmailAddress::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedProvider { email })
        })
    }
}

impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let username = parts
                .headers
                .get("X-Admin-User")
                .and_then(|v| v.to_str().ok())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or(AuthenticationRequired)?;

            Ok(AdminUser { username })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook endpoint (no principal; verified by signature)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/payments - Ingest a gateway webhook delivery
pub async fn handle_payment_webhook(
    State(state): State<CommissionAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, CommissionApiError> {
    let signature = headers
        .get("X-Signature")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.webhook_handler();
    let cmd = IngestWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    // Recognized, ignored, and duplicate events all acknowledge with 200;
    // only signature failures (401), malformed payloads (400), and
    // transient store failures (5xx) reach the error path
    handler.handle(cmd).await?;

    Ok(StatusCode::OK)
}

// ════════════════════════════════════════════════════════════════════════════════
// Provider endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/commission/payments/initialize - Start a gateway settlement
pub async fn initialize_commission_payment(
    State(state): State<CommissionAppState>,
    provider: AuthenticatedProvider,
    Json(request): Json<InitializePaymentRequestDto>,
) -> Result<impl IntoResponse, CommissionApiError> {
    let transaction_ids = parse_transaction_ids(&request.transaction_ids)?;

    let handler = state.initialize_payment_handler();
    let cmd = InitializeCommissionPaymentCommand {
        provider_email: provider.email,
        amount: Money::new(request.amount),
        transaction_ids,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(InitializePaymentResponse::from(result)))
}

/// POST /api/commission/payments/verify - Verify a settlement by reference
pub async fn verify_commission_payment(
    State(state): State<CommissionAppState>,
    provider: AuthenticatedProvider,
    Json(request): Json<VerifyPaymentRequestDto>,
) -> Result<impl IntoResponse, CommissionApiError> {
    let handler = state.verify_payment_handler();
    let cmd = VerifyCommissionPaymentCommand {
        provider_email: provider.email,
        reference: request.reference,
    };

    let response = match handler.handle(cmd).await? {
        VerifyPaymentOutcome::Settled { collected } => VerifyPaymentResponse {
            settled: true,
            status: None,
            collected: Some(collected),
        },
        VerifyPaymentOutcome::NotSettled { status } => VerifyPaymentResponse {
            settled: false,
            status: Some(status.to_string()),
            collected: None,
        },
    };

    Ok(Json(response))
}

/// POST /api/commission/manual - Submit a manual cash settlement
pub async fn submit_manual_payment(
    State(state): State<CommissionAppState>,
    provider: AuthenticatedProvider,
    Json(request): Json<SubmitManualPaymentRequestDto>,
) -> Result<impl IntoResponse, CommissionApiError> {
    let transaction_ids = parse_transaction_ids(&request.transaction_ids)?;

    let handler = state.submit_manual_payment_handler();
    let cmd = SubmitManualPaymentCommand {
        provider_email: provider.email,
        amount: Money::new(request.amount),
        transaction_ids,
        reference: request.reference,
    };

    let result = handler.handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentRequestResponse::from(result)),
    ))
}

/// GET /api/commission/outstanding - Provider's own outstanding summary
pub async fn get_outstanding(
    State(state): State<CommissionAppState>,
    provider: AuthenticatedProvider,
) -> Result<impl IntoResponse, CommissionApiError> {
    let handler = state.outstanding_handler();
    let query = GetOutstandingQuery {
        provider_email: provider.email,
    };

    let result = handler.handle(query).await?;

    Ok(Json(OutstandingResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/commission/transactions - Record a completed booking payment
///
/// Service-to-service endpoint invoked by the booking flow.
pub async fn record_payment(
    State(state): State<CommissionAppState>,
    _admin: AdminUser,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, CommissionApiError> {
    let payment_method = match request.payment_method.as_str() {
        "cash" => PaymentMethod::Cash,
        "card" => PaymentMethod::Card,
        other => {
            return Err(CommissionError::validation(
                "payment_method",
                format!("unknown payment method '{}'", other),
            )
            .into())
        }
    };

    let handler = state.record_payment_handler();
    let cmd = RecordBookingPaymentCommand {
        booking_id: request
            .booking_id
            .parse()
            .map_err(|_| CommissionError::validation("booking_id", "not a valid id"))?,
        business_id: request
            .business_id
            .parse()
            .map_err(|_| CommissionError::validation("business_id", "not a valid id"))?,
        provider_email: EmailAddress::new(&request.provider_email)
            .map_err(CommissionError::from)?,
        customer_email: EmailAddress::new(&request.customer_email)
            .map_err(CommissionError::from)?,
        total_amount: Money::new(request.total_amount),
        payment_method,
        tier: ProviderTier::parse_or_default(&request.tier),
        service_type: ServiceType::parse_or_default(&request.service_type),
        payment_reference: request.payment_reference,
    };

    let result = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(TransactionResponse::from(result))))
}

/// GET /api/commission/admin/outstanding/{provider_email} - Any provider's summary
pub async fn get_outstanding_for_provider(
    State(state): State<CommissionAppState>,
    _admin: AdminUser,
    Path(provider_email): Path<String>,
) -> Result<impl IntoResponse, CommissionApiError> {
    let provider_email = EmailAddress::new(&provider_email).map_err(CommissionError::from)?;

    let handler = state.outstanding_handler();
    let result = handler.handle(GetOutstandingQuery { provider_email }).await?;

    Ok(Json(OutstandingResponse::from(result)))
}

/// GET /api/commission/manual/pending - Verification queue
pub async fn list_pending_requests(
    State(state): State<CommissionAppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, CommissionApiError> {
    let pending = state.payment_requests.list_pending().await.map_err(CommissionError::from)?;

    let response: Vec<PaymentRequestResponse> = pending
        .into_iter()
        .map(PaymentRequestResponse::from)
        .collect();

    Ok(Json(response))
}

/// POST /api/commission/manual/{id}/verify - Admin decision on a request
pub async fn verify_manual_payment(
    State(state): State<CommissionAppState>,
    admin: AdminUser,
    Path(request_id): Path<String>,
    Json(request): Json<VerifyManualPaymentRequestDto>,
) -> Result<impl IntoResponse, CommissionApiError> {
    let decision = match request.decision.as_str() {
        "confirm" => VerificationDecision::Confirm,
        "reject" => VerificationDecision::Reject,
        other => {
            return Err(CommissionError::validation(
                "decision",
                format!("expected 'confirm' or 'reject', got '{}'", other),
            )
            .into())
        }
    };

    let handler = state.verify_manual_payment_handler();
    let cmd = VerifyManualPaymentCommand {
        request_id: request_id
            .parse()
            .map_err(|_| CommissionError::validation("request_id", "not a valid id"))?,
        admin: admin.username,
        decision,
        reason: request.reason,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(PaymentRequestResponse::from(result)))
}

/// POST /api/commission/overdue/sweep - Age pending commissions past the threshold
pub async fn sweep_overdue(
    State(state): State<CommissionAppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, CommissionApiError> {
    let handler = state.mark_overdue_handler();
    let swept = handler.handle().await?;

    Ok(Json(SweepResponse { swept }))
}

fn parse_transaction_ids(
    raw: &[String],
) -> Result<Vec<crate::domain::foundation::TransactionId>, CommissionApiError> {
    raw.iter()
        .map(|s| {
            s.parse().map_err(|_| {
                CommissionApiError(CommissionError::validation(
                    "transaction_ids",
                    format!("'{}' is not a valid id", s),
                ))
            })
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts commission errors to HTTP responses.
pub struct CommissionApiError(pub CommissionError);

impl From<CommissionError> for CommissionApiError {
    fn from(err: CommissionError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for CommissionApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(CommissionError::from(err))
    }
}

impl IntoResponse for CommissionApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            CommissionError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            CommissionError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            CommissionError::AmountMismatch { .. } => (StatusCode::BAD_REQUEST, "AMOUNT_MISMATCH"),
            CommissionError::InvalidWebhookSignature => {
                (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE")
            }
            CommissionError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            CommissionError::Gateway(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR"),
            CommissionError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = ErrorResponse::new(error_code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}
