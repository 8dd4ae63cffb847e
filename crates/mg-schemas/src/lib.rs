//! mg-schemas
//!
//! Wire and domain types shared by the expedition service, its store
//! implementations, the daemon and the CLI. JSON field names are camelCase to
//! match what the dashboard consumes. No business logic lives here beyond the
//! verdict invariant.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Contract-level state
// ---------------------------------------------------------------------------

/// Contract payment state as stored by the contract store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(PaymentStatus::Pending),
            "PAID" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }

    /// The "payment pending" signal consumed by the delivery evaluator.
    pub fn is_pending(&self) -> bool {
        matches!(self, PaymentStatus::Pending)
    }
}

// ---------------------------------------------------------------------------
// Scheduled delivery items
// ---------------------------------------------------------------------------

/// One physical asset unit committed for delivery under a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledDeliveryItem {
    pub id: i64,
    pub contract_id: i64,
    pub contract_number: String,
    pub customer_name: String,
    pub asset_code: String,
    pub asset_type: String,
    pub scheduled_delivery_date: NaiveDate,
    pub contract_signed_at: Option<DateTime<Utc>>,
}

/// What a contract store hands back per item: the item itself plus the
/// contract's payment-pending signal, read in the same query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCandidate {
    #[serde(flatten)]
    pub item: ScheduledDeliveryItem,
    pub payment_pending: bool,
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Machine-readable reason a scheduled delivery must not be dispatched yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryBlockedReason {
    /// The contract has no signature timestamp.
    ContratoNaoAssinado,
    /// The contract is signed but its payment precondition is unmet.
    PagamentoPendente,
}

impl DeliveryBlockedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryBlockedReason::ContratoNaoAssinado => "CONTRATO_NAO_ASSINADO",
            DeliveryBlockedReason::PagamentoPendente => "PAGAMENTO_PENDENTE",
        }
    }
}

impl fmt::Display for DeliveryBlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blocked / released decision for one scheduled delivery.
///
/// Only constructible from an optional reason, so `is_blocked` can never
/// disagree with `delivery_blocked_reason`. Deserialization goes through the
/// same check and rejects inconsistent payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawVerdict")]
pub struct Verdict {
    is_blocked: bool,
    delivery_blocked_reason: Option<DeliveryBlockedReason>,
}

impl Verdict {
    pub fn released() -> Self {
        Self::from_reason(None)
    }

    pub fn blocked(reason: DeliveryBlockedReason) -> Self {
        Self::from_reason(Some(reason))
    }

    pub fn from_reason(reason: Option<DeliveryBlockedReason>) -> Self {
        Self {
            is_blocked: reason.is_some(),
            delivery_blocked_reason: reason,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.is_blocked
    }

    pub fn reason(&self) -> Option<DeliveryBlockedReason> {
        self.delivery_blocked_reason
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    is_blocked: bool,
    #[serde(default)]
    delivery_blocked_reason: Option<DeliveryBlockedReason>,
}

impl TryFrom<RawVerdict> for Verdict {
    type Error = String;

    fn try_from(raw: RawVerdict) -> Result<Self, Self::Error> {
        if raw.is_blocked != raw.delivery_blocked_reason.is_some() {
            return Err(format!(
                "inconsistent verdict: isBlocked={} deliveryBlockedReason={:?}",
                raw.is_blocked, raw.delivery_blocked_reason
            ));
        }
        Ok(Verdict::from_reason(raw.delivery_blocked_reason))
    }
}

// ---------------------------------------------------------------------------
// Expedition projections
// ---------------------------------------------------------------------------

/// One row of the expedition panel: item fields plus its verdict, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionItem {
    #[serde(flatten)]
    pub item: ScheduledDeliveryItem,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl ExpeditionItem {
    pub fn is_blocked(&self) -> bool {
        self.verdict.is_blocked()
    }

    pub fn reason(&self) -> Option<DeliveryBlockedReason> {
        self.verdict.reason()
    }
}

/// Counters for the dashboard badge over one query window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpeditionSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: usize,
    pub released: usize,
    pub blocked: usize,
    /// Keyed by reason code string (e.g. `"PAGAMENTO_PENDENTE"`).
    pub blocked_by_reason: BTreeMap<String, usize>,
}

// ---------------------------------------------------------------------------
// Seed fixtures
// ---------------------------------------------------------------------------

/// Seed data accepted by `mg db seed` and the daemon's memory backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeedFixture {
    pub contracts: Vec<SeedContract>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedContract {
    pub contract_number: String,
    pub customer_name: String,
    pub signed_at: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedItem {
    pub asset_code: String,
    pub asset_type: String,
    /// `None` means the item exists but has not been scheduled yet.
    pub scheduled_delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}
