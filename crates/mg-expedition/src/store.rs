use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mg_schemas::{DeliveryCandidate, ScheduledDeliveryItem, SeedFixture};
use tokio::sync::RwLock;

use crate::DateWindow;

/// Read side of the contract/item store consumed by the expedition query.
///
/// One call = one read. Implementations return undelivered items whose
/// scheduled delivery date falls in `window`, each paired with its contract's
/// payment-pending signal.
#[async_trait::async_trait]
pub trait ContractStore: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_candidates(&self, window: &DateWindow) -> Result<Vec<DeliveryCandidate>>;
}

/// Process-local store used by tests and the daemon's `memory` backend.
#[derive(Debug, Default)]
pub struct InMemoryContractStore {
    rows: RwLock<Vec<StoredRow>>,
}

#[derive(Debug, Clone)]
struct StoredRow {
    candidate: DeliveryCandidate,
    delivered_at: Option<DateTime<Utc>>,
}

impl InMemoryContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(candidates: impl IntoIterator<Item = DeliveryCandidate>) -> Self {
        let rows = candidates
            .into_iter()
            .map(|candidate| StoredRow {
                candidate,
                delivered_at: None,
            })
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Build a store from seed contracts. Contracts and items get 1-based ids
    /// in fixture order; unscheduled items are skipped and delivered items
    /// are kept but never returned.
    pub fn from_seed(seed: &SeedFixture) -> Self {
        let mut rows = Vec::new();
        let mut item_id = 0_i64;

        for (n, contract) in seed.contracts.iter().enumerate() {
            let contract_id = n as i64 + 1;
            for item in &contract.items {
                item_id += 1;
                let Some(date) = item.scheduled_delivery_date else {
                    continue;
                };
                rows.push(StoredRow {
                    candidate: DeliveryCandidate {
                        item: ScheduledDeliveryItem {
                            id: item_id,
                            contract_id,
                            contract_number: contract.contract_number.clone(),
                            customer_name: contract.customer_name.clone(),
                            asset_code: item.asset_code.clone(),
                            asset_type: item.asset_type.clone(),
                            scheduled_delivery_date: date,
                            contract_signed_at: contract.signed_at,
                        },
                        payment_pending: contract.payment_status.is_pending(),
                    },
                    delivered_at: item.delivered_at,
                });
            }
        }

        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Load a JSON [`SeedFixture`] file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read seed fixture: {}", path.display()))?;
        let seed: SeedFixture = serde_json::from_str(&raw)
            .with_context(|| format!("parse seed fixture: {}", path.display()))?;
        Ok(Self::from_seed(&seed))
    }

    pub async fn insert(&self, candidate: DeliveryCandidate) {
        self.rows.write().await.push(StoredRow {
            candidate,
            delivered_at: None,
        });
    }

    /// Mark an item delivered; it drops out of every later query.
    /// Returns false when no such item exists.
    pub async fn mark_delivered(&self, item_id: i64, at: DateTime<Utc>) -> bool {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.candidate.item.id == item_id) {
            Some(row) => {
                row.delivered_at = Some(at);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ContractStore for InMemoryContractStore {
    fn source_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_candidates(&self, window: &DateWindow) -> Result<Vec<DeliveryCandidate>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| r.delivered_at.is_none())
            .filter(|r| window.contains(r.candidate.item.scheduled_delivery_date))
            .map(|r| r.candidate.clone())
            .collect())
    }
}
