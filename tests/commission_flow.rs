//! End-to-end flows over the application handlers with in-memory stores.
//!
//! Covers the reconciliation engine's contract: the money split, webhook
//! idempotency under redelivery and concurrency, the manual settlement
//! workflow, and agreement between the ledger and the outstanding summary.

mod common;

use std::sync::Arc;

use rust_decimal_macros::dec;

use artisan_market::application::handlers::commission::{
    GetOutstandingHandler, GetOutstandingQuery, IngestGatewayWebhookHandler,
    IngestOutcome, IngestWebhookCommand, InitializeCommissionPaymentCommand,
    InitializeCommissionPaymentHandler, MarkOverdueHandler, RecordBookingPaymentCommand,
    RecordBookingPaymentHandler, SubmitManualPaymentCommand, SubmitManualPaymentHandler,
    VerificationDecision, VerifyCommissionPaymentCommand, VerifyCommissionPaymentHandler,
    VerifyManualPaymentCommand, VerifyManualPaymentHandler, VerifyPaymentOutcome,
};
use artisan_market::adapters::gateway::{settled_payment, MockPaymentGateway};
use artisan_market::domain::commission::{
    CommissionError, CommissionStatus, PaymentMethod, PaymentStatus, PaymentTransaction,
    ProviderTier, RateTable, ServiceType,
};
use artisan_market::domain::foundation::{BookingId, BusinessId, Money, Timestamp};
use artisan_market::domain::settlement::RequestStatus;
use artisan_market::ports::{InitializedPayment, TransactionLedger};

use common::{
    customer, provider, sign, InMemoryAuditLog, InMemoryLedger, InMemoryPaymentRequests,
    InMemoryProcessedEvents, PROVIDER_EMAIL, WEBHOOK_SECRET,
};

const OVERDUE_DAYS: i64 = 30;

fn record_handler(ledger: &InMemoryLedger) -> RecordBookingPaymentHandler {
    RecordBookingPaymentHandler::new(Arc::new(ledger.clone()), RateTable::default())
}

fn webhook_handler(
    ledger: &InMemoryLedger,
    events: &InMemoryProcessedEvents,
) -> IngestGatewayWebhookHandler {
    IngestGatewayWebhookHandler::new(
        Arc::new(ledger.clone()),
        Arc::new(events.clone()),
        WEBHOOK_SECRET,
    )
}

async fn record_payment(
    ledger: &InMemoryLedger,
    amount: &str,
    method: PaymentMethod,
    tier: ProviderTier,
    reference: Option<&str>,
) -> PaymentTransaction {
    record_handler(ledger)
        .handle(RecordBookingPaymentCommand {
            booking_id: BookingId::new(),
            business_id: BusinessId::new(),
            provider_email: provider(),
            customer_email: customer(),
            total_amount: Money::new(amount.parse().unwrap()),
            payment_method: method,
            tier,
            service_type: ServiceType::Standard,
            payment_reference: reference.map(str::to_string),
        })
        .await
        .unwrap()
}

fn charge_success_payload(reference: &str, event_id: i64) -> Vec<u8> {
    format!(
        r#"{{"event":"charge.success","data":{{"id":{},"reference":"{}","amount":100.00}}}}"#,
        event_id, reference
    )
    .into_bytes()
}

fn signed_command(payload: Vec<u8>) -> IngestWebhookCommand {
    let signature = sign(&payload, WEBHOOK_SECRET);
    IngestWebhookCommand {
        payload,
        signature: Some(signature),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Card flow: premium provider, auto-collected commission
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn premium_card_payment_collects_commission_via_webhook() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let txn = record_payment(
        &ledger,
        "100.00",
        PaymentMethod::Card,
        ProviderTier::Premium,
        Some("trx_card_1"),
    )
    .await;

    assert_eq!(txn.platform_commission, Money::new(dec!(15.00)));
    assert_eq!(txn.provider_payout, Money::new(dec!(85.00)));
    assert_eq!(txn.commission_owed, Money::ZERO);
    assert_eq!(txn.commission_status, CommissionStatus::Pending);

    let outcome = webhook_handler(&ledger, &events)
        .handle(signed_command(charge_success_payload("trx_card_1", 9001)))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        IngestOutcome::ChargeApplied {
            transaction_id: txn.id,
            commission_collected: true,
        }
    );

    let stored = ledger.get(&txn.id).unwrap();
    assert_eq!(stored.payment_status, PaymentStatus::Completed);
    assert_eq!(stored.commission_status, CommissionStatus::Collected);
    assert_eq!(stored.commission_owed, Money::ZERO);
    assert_eq!(
        stored.commission_payment_reference.as_deref(),
        Some("trx_card_1")
    );
}

#[tokio::test]
async fn webhook_with_bad_signature_is_rejected_before_parsing() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let payload = charge_success_payload("trx_card_1", 9001);
    let cmd = IngestWebhookCommand {
        signature: Some(sign(&payload, "the_wrong_secret")),
        payload,
    };

    let result = webhook_handler(&ledger, &events).handle(cmd).await;

    assert!(matches!(
        result,
        Err(CommissionError::InvalidWebhookSignature)
    ));
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let result = webhook_handler(&ledger, &events)
        .handle(IngestWebhookCommand {
            payload: charge_success_payload("trx_card_1", 9001),
            signature: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(CommissionError::InvalidWebhookSignature)
    ));
}

#[tokio::test]
async fn unknown_event_is_acknowledged_not_errored() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let payload = br#"{"event":"subscription.create","data":{"id":1}}"#.to_vec();
    let outcome = webhook_handler(&ledger, &events)
        .handle(signed_command(payload))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        IngestOutcome::Ignored {
            event: "subscription.create".to_string()
        }
    );
}

#[tokio::test]
async fn charge_failed_leaves_commission_untouched() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let txn = record_payment(
        &ledger,
        "80.00",
        PaymentMethod::Card,
        ProviderTier::Standard,
        Some("trx_fail_1"),
    )
    .await;

    let payload = br#"{"event":"charge.failed","data":{"id":9100,"reference":"trx_fail_1"}}"#.to_vec();
    webhook_handler(&ledger, &events)
        .handle(signed_command(payload))
        .await
        .unwrap();

    let stored = ledger.get(&txn.id).unwrap();
    assert_eq!(stored.payment_status, PaymentStatus::Failed);
    assert_eq!(stored.commission_status, CommissionStatus::Pending);
}

// ════════════════════════════════════════════════════════════════════════════════
// Idempotency: redelivery and concurrency
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn duplicate_webhook_delivery_changes_nothing_the_second_time() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let txn = record_payment(
        &ledger,
        "100.00",
        PaymentMethod::Card,
        ProviderTier::Premium,
        Some("trx_dup_1"),
    )
    .await;

    let handler = webhook_handler(&ledger, &events);
    handler
        .handle(signed_command(charge_success_payload("trx_dup_1", 42)))
        .await
        .unwrap();
    let after_first = ledger.get(&txn.id).unwrap();

    let second = handler
        .handle(signed_command(charge_success_payload("trx_dup_1", 42)))
        .await
        .unwrap();

    assert_eq!(second, IngestOutcome::AlreadyProcessed);
    let after_second = ledger.get(&txn.id).unwrap();
    assert_eq!(after_first.commission_owed, after_second.commission_owed);
    assert_eq!(
        after_first.commission_status,
        after_second.commission_status
    );

    // Not double-counted by the read model either
    let reader = ledger.reader();
    let summary_handler = GetOutstandingHandler::new(
        Arc::new(ledger.clone()),
        Arc::new(reader),
        OVERDUE_DAYS,
    );
    let result = summary_handler
        .handle(GetOutstandingQuery {
            provider_email: provider(),
        })
        .await
        .unwrap();
    assert_eq!(result.summary.total_owed, Money::ZERO);
}

#[tokio::test]
async fn concurrent_duplicate_deliveries_apply_exactly_once() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let txn = record_payment(
        &ledger,
        "100.00",
        PaymentMethod::Card,
        ProviderTier::Premium,
        Some("trx_race_1"),
    )
    .await;

    let handler = Arc::new(webhook_handler(&ledger, &events));
    let (a, b) = tokio::join!(
        handler.handle(signed_command(charge_success_payload("trx_race_1", 77))),
        handler.handle(signed_command(charge_success_payload("trx_race_1", 77))),
    );

    // Both deliveries succeed from the gateway's point of view
    a.unwrap();
    b.unwrap();

    // Final state identical to a single delivery
    let stored = ledger.get(&txn.id).unwrap();
    assert_eq!(stored.payment_status, PaymentStatus::Completed);
    assert_eq!(stored.commission_status, CommissionStatus::Collected);
    assert_eq!(stored.commission_owed, Money::ZERO);
}

#[tokio::test]
async fn collected_is_terminal_under_any_later_transition() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let txn = record_payment(
        &ledger,
        "100.00",
        PaymentMethod::Card,
        ProviderTier::Premium,
        Some("trx_term_1"),
    )
    .await;

    webhook_handler(&ledger, &events)
        .handle(signed_command(charge_success_payload("trx_term_1", 500)))
        .await
        .unwrap();

    // Attempted transitions out of Collected are no-ops
    use artisan_market::domain::commission::CommissionStatusDetails;
    for target in [
        CommissionStatus::Pending,
        CommissionStatus::PendingVerification,
        CommissionStatus::Overdue,
    ] {
        let result = ledger
            .update_commission_status(&txn.id, target, CommissionStatusDetails::none())
            .await
            .unwrap();
        assert_eq!(result.commission_status, CommissionStatus::Collected);
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Cash flow: outstanding commission and ageing
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn standard_cash_payment_owes_commission_and_ages_into_overdue() {
    let ledger = InMemoryLedger::new();

    let txn = record_payment(
        &ledger,
        "200.00",
        PaymentMethod::Cash,
        ProviderTier::Standard,
        None,
    )
    .await;

    assert_eq!(txn.platform_commission, Money::new(dec!(36.00)));
    assert_eq!(txn.commission_owed, Money::new(dec!(36.00)));
    assert_eq!(txn.commission_status, CommissionStatus::Pending);
    // Cash changes hands in person, so the payment itself is complete
    assert_eq!(txn.payment_status, PaymentStatus::Completed);

    // Age the row past the threshold
    ledger.set_created_at(&txn.id, Timestamp::now().minus_days(31));

    // The read model reports it overdue even before any sweep runs
    let reader = ledger.reader();
    let summary = GetOutstandingHandler::new(Arc::new(ledger.clone()), Arc::new(reader), OVERDUE_DAYS)
        .handle(GetOutstandingQuery {
            provider_email: provider(),
        })
        .await
        .unwrap()
        .summary;

    assert_eq!(summary.overdue_count, 1);
    assert_eq!(summary.overdue_amount, Money::new(dec!(36.00)));

    // The sweep then makes the state explicit
    let swept = MarkOverdueHandler::new(Arc::new(ledger.clone()), OVERDUE_DAYS)
        .handle()
        .await
        .unwrap();
    assert_eq!(swept, 1);
}

#[tokio::test]
async fn aggregator_total_equals_sum_of_ledger_rows() {
    let ledger = InMemoryLedger::new();

    for amount in ["200.00", "150.00", "99.95"] {
        record_payment(
            &ledger,
            amount,
            PaymentMethod::Cash,
            ProviderTier::Standard,
            None,
        )
        .await;
    }

    let reader = ledger.reader();
    let result = GetOutstandingHandler::new(Arc::new(ledger.clone()), Arc::new(reader), OVERDUE_DAYS)
        .handle(GetOutstandingQuery {
            provider_email: provider(),
        })
        .await
        .unwrap();

    let ledger_sum: Money = result
        .transactions
        .iter()
        .map(|t| t.commission_owed)
        .sum();
    assert_eq!(result.summary.total_owed, ledger_sum);
    assert_eq!(result.summary.transaction_count, 3);
    assert_eq!(result.summary.breakdown.cash_count, 3);
    assert_eq!(result.summary.breakdown.card_count, 0);
}

// ════════════════════════════════════════════════════════════════════════════════
// Manual settlement workflow
// ════════════════════════════════════════════════════════════════════════════════

struct ManualFixture {
    ledger: InMemoryLedger,
    requests: InMemoryPaymentRequests,
    audit: InMemoryAuditLog,
    txn_a: PaymentTransaction,
    txn_b: PaymentTransaction,
}

async fn manual_fixture() -> ManualFixture {
    let ledger = InMemoryLedger::new();
    // 0.18 * 150 = 27.00 and 0.18 * 127.78 = 23.0004 -> 23.00, sum 50.00
    let txn_a = record_payment(
        &ledger,
        "150.00",
        PaymentMethod::Cash,
        ProviderTier::Standard,
        None,
    )
    .await;
    let txn_b = record_payment(
        &ledger,
        "127.78",
        PaymentMethod::Cash,
        ProviderTier::Standard,
        None,
    )
    .await;
    ManualFixture {
        ledger,
        requests: InMemoryPaymentRequests::new(),
        audit: InMemoryAuditLog::new(),
        txn_a,
        txn_b,
    }
}

fn submit_handler(f: &ManualFixture) -> SubmitManualPaymentHandler {
    SubmitManualPaymentHandler::new(Arc::new(f.ledger.clone()), Arc::new(f.requests.clone()))
}

fn verify_handler(f: &ManualFixture) -> VerifyManualPaymentHandler {
    VerifyManualPaymentHandler::new(
        Arc::new(f.ledger.clone()),
        Arc::new(f.requests.clone()),
        Arc::new(f.audit.clone()),
        OVERDUE_DAYS,
    )
}

#[tokio::test]
async fn matching_manual_submission_parks_transactions_for_verification() {
    let f = manual_fixture().await;
    assert_eq!(
        f.txn_a.commission_owed + f.txn_b.commission_owed,
        Money::new(dec!(50.00))
    );

    let request = submit_handler(&f)
        .handle(SubmitManualPaymentCommand {
            provider_email: provider(),
            amount: Money::new(dec!(50.00)),
            transaction_ids: vec![f.txn_a.id, f.txn_b.id],
            reference: "DEP-1001".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(request.status, RequestStatus::PendingVerification);
    assert_eq!(
        f.ledger.get(&f.txn_a.id).unwrap().commission_status,
        CommissionStatus::PendingVerification
    );
    assert_eq!(
        f.ledger.get(&f.txn_b.id).unwrap().commission_status,
        CommissionStatus::PendingVerification
    );
}

#[tokio::test]
async fn mismatched_amount_is_rejected_and_nothing_changes() {
    let f = manual_fixture().await;

    let result = submit_handler(&f)
        .handle(SubmitManualPaymentCommand {
            provider_email: provider(),
            amount: Money::new(dec!(45.00)),
            transaction_ids: vec![f.txn_a.id, f.txn_b.id],
            reference: "DEP-1002".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(CommissionError::AmountMismatch { .. })
    ));
    assert!(f.requests.all().is_empty());
    assert_eq!(
        f.ledger.get(&f.txn_a.id).unwrap().commission_status,
        CommissionStatus::Pending
    );
    assert_eq!(
        f.ledger.get(&f.txn_b.id).unwrap().commission_status,
        CommissionStatus::Pending
    );
}

#[tokio::test]
async fn admin_confirmation_collects_and_audits() {
    let f = manual_fixture().await;
    let request = submit_handler(&f)
        .handle(SubmitManualPaymentCommand {
            provider_email: provider(),
            amount: Money::new(dec!(50.00)),
            transaction_ids: vec![f.txn_a.id, f.txn_b.id],
            reference: "DEP-1003".to_string(),
        })
        .await
        .unwrap();

    let decided = verify_handler(&f)
        .handle(VerifyManualPaymentCommand {
            request_id: request.id,
            admin: "ops@platform.example".to_string(),
            decision: VerificationDecision::Confirm,
            reason: None,
        })
        .await
        .unwrap();

    assert_eq!(decided.status, RequestStatus::Verified);
    assert_eq!(decided.verified_by.as_deref(), Some("ops@platform.example"));

    for id in [f.txn_a.id, f.txn_b.id] {
        let stored = f.ledger.get(&id).unwrap();
        assert_eq!(stored.commission_status, CommissionStatus::Collected);
        assert_eq!(stored.commission_owed, Money::ZERO);
        assert_eq!(
            stored.commission_payment_reference.as_deref(),
            Some("DEP-1003")
        );
        assert!(stored.commission_paid_date.is_some());
    }

    let audit = f.audit.all();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].new_value.as_deref(), Some("verified"));
}

#[tokio::test]
async fn admin_rejection_reverts_transactions_to_prior_status() {
    let f = manual_fixture().await;
    let request = submit_handler(&f)
        .handle(SubmitManualPaymentCommand {
            provider_email: provider(),
            amount: Money::new(dec!(50.00)),
            transaction_ids: vec![f.txn_a.id, f.txn_b.id],
            reference: "DEP-1004".to_string(),
        })
        .await
        .unwrap();

    let decided = verify_handler(&f)
        .handle(VerifyManualPaymentCommand {
            request_id: request.id,
            admin: "ops@platform.example".to_string(),
            decision: VerificationDecision::Reject,
            reason: Some("deposit not received".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(decided.status, RequestStatus::Rejected);

    // Neither transaction is silently left in PendingVerification
    for id in [f.txn_a.id, f.txn_b.id] {
        let stored = f.ledger.get(&id).unwrap();
        assert_eq!(stored.commission_status, CommissionStatus::Pending);
        assert_eq!(stored.commission_owed.is_zero(), false);
    }
}

#[tokio::test]
async fn foreign_provider_cannot_settle_someone_elses_transactions() {
    let f = manual_fixture().await;

    let result = submit_handler(&f)
        .handle(SubmitManualPaymentCommand {
            provider_email: artisan_market::domain::foundation::EmailAddress::new(
                "other.provider@example.com",
            )
            .unwrap(),
            amount: Money::new(dec!(50.00)),
            transaction_ids: vec![f.txn_a.id, f.txn_b.id],
            reference: "DEP-1005".to_string(),
        })
        .await;

    assert!(matches!(result, Err(CommissionError::Forbidden(_))));
}

// ════════════════════════════════════════════════════════════════════════════════
// Gateway settlement: initialize and verify
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn initialize_verifies_amount_server_side_before_delegating() {
    let f = manual_fixture().await;
    let gateway = MockPaymentGateway::new();
    gateway.set_initialize_result(InitializedPayment {
        authorization_url: "https://pay.example/checkout/abc".to_string(),
        reference: "stl_abc".to_string(),
    });

    let handler = InitializeCommissionPaymentHandler::new(
        Arc::new(f.ledger.clone()),
        Arc::new(gateway.clone()),
    );

    // Wrong amount never reaches the gateway
    let mismatch = handler
        .handle(InitializeCommissionPaymentCommand {
            provider_email: provider(),
            amount: Money::new(dec!(10.00)),
            transaction_ids: vec![f.txn_a.id, f.txn_b.id],
        })
        .await;
    assert!(matches!(
        mismatch,
        Err(CommissionError::AmountMismatch { .. })
    ));
    assert_eq!(gateway.initialize_calls(), 0);

    // Matching amount delegates and returns the checkout URL
    let initialized = handler
        .handle(InitializeCommissionPaymentCommand {
            provider_email: provider(),
            amount: Money::new(dec!(50.00)),
            transaction_ids: vec![f.txn_a.id, f.txn_b.id],
        })
        .await
        .unwrap();

    assert_eq!(initialized.reference, "stl_abc");
    assert_eq!(gateway.initialize_calls(), 1);
    let logged = &gateway.initialize_log()[0];
    assert_eq!(logged.amount, Money::new(dec!(50.00)));
    assert_eq!(logged.metadata.provider_email, PROVIDER_EMAIL);
}

#[tokio::test]
async fn verify_payment_applies_batch_collection_once() {
    let f = manual_fixture().await;
    let gateway = MockPaymentGateway::new();
    gateway.set_verify_result(
        "stl_xyz",
        settled_payment(
            "stl_xyz",
            vec![f.txn_a.id.to_string(), f.txn_b.id.to_string()],
            PROVIDER_EMAIL,
        ),
    );

    let handler = VerifyCommissionPaymentHandler::new(
        Arc::new(f.ledger.clone()),
        Arc::new(gateway.clone()),
        Arc::new(InMemoryProcessedEvents::new()),
    );

    let outcome = handler
        .handle(VerifyCommissionPaymentCommand {
            provider_email: provider(),
            reference: "stl_xyz".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(outcome, VerifyPaymentOutcome::Settled { collected: 2 });
    for id in [f.txn_a.id, f.txn_b.id] {
        assert_eq!(
            f.ledger.get(&id).unwrap().commission_status,
            CommissionStatus::Collected
        );
    }

    // Verifying again is harmless: the batch is already collected
    let again = handler
        .handle(VerifyCommissionPaymentCommand {
            provider_email: provider(),
            reference: "stl_xyz".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(again, VerifyPaymentOutcome::Settled { collected: 2 });
}

#[tokio::test]
async fn verify_payment_rejects_foreign_settlement() {
    let f = manual_fixture().await;
    let gateway = MockPaymentGateway::new();
    gateway.set_verify_result(
        "stl_foreign",
        settled_payment(
            "stl_foreign",
            vec![f.txn_a.id.to_string()],
            "other.provider@example.com",
        ),
    );

    let handler = VerifyCommissionPaymentHandler::new(
        Arc::new(f.ledger.clone()),
        Arc::new(gateway),
        Arc::new(InMemoryProcessedEvents::new()),
    );

    let result = handler
        .handle(VerifyCommissionPaymentCommand {
            provider_email: provider(),
            reference: "stl_foreign".to_string(),
        })
        .await;

    assert!(matches!(result, Err(CommissionError::Forbidden(_))));
}

// ════════════════════════════════════════════════════════════════════════════════
// Settlement webhook (batch metadata)
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn settlement_webhook_collects_batch_from_pending_and_overdue() {
    let ledger = InMemoryLedger::new();
    let events = InMemoryProcessedEvents::new();

    let txn_a = record_payment(
        &ledger,
        "150.00",
        PaymentMethod::Cash,
        ProviderTier::Standard,
        None,
    )
    .await;
    let txn_b = record_payment(
        &ledger,
        "127.78",
        PaymentMethod::Cash,
        ProviderTier::Standard,
        None,
    )
    .await;

    // One of the two already aged into Overdue
    use artisan_market::domain::commission::CommissionStatusDetails;
    ledger
        .update_commission_status(
            &txn_b.id,
            CommissionStatus::Overdue,
            CommissionStatusDetails::none(),
        )
        .await
        .unwrap();

    let payload = format!(
        r#"{{"event":"charge.success","data":{{"id":8800,"reference":"stl_hook_1","metadata":{{"purpose":"commission_settlement","transaction_ids":["{}","{}"],"provider_email":"{}"}}}}}}"#,
        txn_a.id, txn_b.id, PROVIDER_EMAIL
    )
    .into_bytes();

    let outcome = webhook_handler(&ledger, &events)
        .handle(signed_command(payload))
        .await
        .unwrap();

    assert_eq!(outcome, IngestOutcome::SettlementApplied { collected: 2 });
    for id in [txn_a.id, txn_b.id] {
        let stored = ledger.get(&id).unwrap();
        assert_eq!(stored.commission_status, CommissionStatus::Collected);
        assert_eq!(stored.commission_owed, Money::ZERO);
        assert_eq!(
            stored.commission_payment_reference.as_deref(),
            Some("stl_hook_1")
        );
    }
}
