//! Shared runtime state for mg-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The state holds no
//! verdicts: every request reads the contract store again.

use std::sync::Arc;

use mg_expedition::ContractStore;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: "mg-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Static build metadata.
    pub build: BuildInfo,
    /// Source of scheduled items and contract state.
    pub store: Arc<dyn ContractStore>,
    /// Hash of the layered config this process booted with, if any.
    pub config_hash: Option<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContractStore>) -> Self {
        Self {
            build: BuildInfo::default(),
            store,
            config_hash: None,
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }
}
