//! Axum router configuration for commission endpoints.
//!
//! Wires the route structure to the handlers. Webhook routes live on a
//! separate router because they carry no user principal; deliveries are
//! authenticated by signature instead.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_outstanding, get_outstanding_for_provider, handle_payment_webhook,
    initialize_commission_payment, list_pending_requests, record_payment,
    submit_manual_payment, sweep_overdue, verify_commission_payment, verify_manual_payment,
    CommissionAppState,
};

/// Create the commission API router.
///
/// # Routes
///
/// ## Provider Endpoints (require provider authentication)
/// - `GET /outstanding` - Own outstanding commission summary
/// - `POST /payments/initialize` - Start a gateway settlement charge
/// - `POST /payments/verify` - Verify a settlement by reference
/// - `POST /manual` - Submit a manual cash settlement
///
/// ## Admin Endpoints (require admin role)
/// - `POST /transactions` - Record a completed booking payment
/// - `GET /admin/outstanding/{provider_email}` - Any provider's summary
/// - `GET /manual/pending` - Verification queue
/// - `POST /manual/{id}/verify` - Confirm or reject a manual settlement
/// - `POST /overdue/sweep` - Age pending commissions past the threshold
pub fn commission_routes() -> Router<CommissionAppState> {
    Router::new()
        // Provider endpoints
        .route("/outstanding", get(get_outstanding))
        .route("/payments/initialize", post(initialize_commission_payment))
        .route("/payments/verify", post(verify_commission_payment))
        .route("/manual", post(submit_manual_payment))
        // Admin endpoints
        .route("/transactions", post(record_payment))
        .route("/admin/outstanding/:provider_email", get(get_outstanding_for_provider))
        .route("/manual/pending", get(list_pending_requests))
        .route("/manual/:id/verify", post(verify_manual_payment))
        .route("/overdue/sweep", post(sweep_overdue))
}

/// Create the webhook router.
///
/// Separate from the commission routes because webhooks carry no user
/// authentication; they are verified via the `X-Signature` header.
///
/// # Routes
/// - `POST /payments` - Ingest gateway webhook deliveries
pub fn webhook_routes() -> Router<CommissionAppState> {
    Router::new().route("/payments", post(handle_payment_webhook))
}

/// Create the complete commission module router.
///
/// Mounts the commission and webhook routers, suitable for nesting under
/// `/api`.
pub fn commission_router() -> Router<CommissionAppState> {
    Router::new()
        .nest("/commission", commission_routes())
        .nest("/webhooks", webhook_routes())
}
