use anyhow::Result;
use sqlx::PgPool;

use mg_expedition::{ContractStore, DateWindow};
use mg_schemas::DeliveryCandidate;

/// [`ContractStore`] backed by the `contracts` / `contract_items` tables.
#[derive(Debug, Clone)]
pub struct PgContractStore {
    pool: PgPool,
}

impl PgContractStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContractStore for PgContractStore {
    fn source_name(&self) -> &'static str {
        "postgres"
    }

    async fn fetch_candidates(&self, window: &DateWindow) -> Result<Vec<DeliveryCandidate>> {
        crate::fetch_scheduled_deliveries(&self.pool, window).await
    }
}
