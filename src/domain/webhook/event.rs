//! Gateway event envelope and classification.
//!
//! The gateway delivers a JSON envelope `{event, data}`. The event name is
//! an open string on the wire; [`GatewayEvent::classify`] maps it into the
//! closed set this system acts on, with everything else acknowledged and
//! ignored so the gateway does not retry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::EventId;

/// Raw webhook envelope as delivered by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEvent {
    /// Event name, e.g. `charge.success`.
    pub event: String,
    /// Event payload.
    pub data: GatewayEventData,
}

/// Payload carried by every gateway event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayEventData {
    /// Gateway-assigned numeric event/transaction id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Gateway reference for the charge or transfer.
    #[serde(default)]
    pub reference: Option<String>,
    /// Amount in major currency units.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Free-form metadata attached at initialization time.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Customer details, if the gateway includes them.
    #[serde(default)]
    pub customer: Option<GatewayCustomer>,
    /// Gateway fees, informational only.
    #[serde(default)]
    pub fees: Option<Decimal>,
}

/// Customer block inside a gateway event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayCustomer {
    #[serde(default)]
    pub email: Option<String>,
}

/// The closed set of event kinds this system acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEventKind {
    ChargeSuccess,
    ChargeFailed,
    TransferSuccess,
    TransferFailed,
    /// Anything else: acknowledged, logged, never an error.
    Unknown(String),
}

/// Metadata marking a charge as a batch commission settlement.
///
/// Attached at payment-initialization time and echoed back by the gateway,
/// it carries the ledger rows the settlement covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementMetadata {
    /// Discriminator; must equal [`SettlementMetadata::PURPOSE`].
    pub purpose: String,
    /// Ledger transaction ids covered by this settlement.
    pub transaction_ids: Vec<String>,
    /// Provider the settlement belongs to.
    pub provider_email: String,
}

impl SettlementMetadata {
    /// Discriminator value in gateway metadata.
    pub const PURPOSE: &'static str = "commission_settlement";

    /// Builds the metadata to attach when initializing a settlement charge.
    pub fn new(transaction_ids: Vec<String>, provider_email: impl Into<String>) -> Self {
        Self {
            purpose: Self::PURPOSE.to_string(),
            transaction_ids,
            provider_email: provider_email.into(),
        }
    }
}

impl GatewayEvent {
    /// Maps the wire event name into the closed kind set.
    pub fn classify(&self) -> GatewayEventKind {
        match self.event.as_str() {
            "charge.success" => GatewayEventKind::ChargeSuccess,
            "charge.failed" => GatewayEventKind::ChargeFailed,
            "transfer.success" => GatewayEventKind::TransferSuccess,
            "transfer.failed" => GatewayEventKind::TransferFailed,
            other => GatewayEventKind::Unknown(other.to_string()),
        }
    }

    /// Stable id for the processed-events log.
    ///
    /// Prefers the gateway's numeric event id; falls back to the charge
    /// reference, which is equally unique per logical event.
    pub fn event_id(&self) -> Option<EventId> {
        if let Some(id) = self.data.id {
            return Some(EventId::from_string(format!("evt_{}", id)));
        }
        self.data
            .reference
            .as_ref()
            .map(|r| EventId::from_string(r.clone()))
    }

    /// Extracts commission-settlement metadata, if this charge is one.
    ///
    /// Returns `None` for regular booking charges or when the metadata
    /// block is absent or has a different purpose.
    pub fn settlement_metadata(&self) -> Option<SettlementMetadata> {
        let value = self.data.metadata.clone()?;
        let parsed: SettlementMetadata = serde_json::from_value(value).ok()?;
        if parsed.purpose == SettlementMetadata::PURPOSE {
            Some(parsed)
        } else {
            None
        }
    }
}
