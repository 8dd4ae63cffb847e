//! Response types for mg-daemon HTTP endpoints that are not domain payloads.
//!
//! Expedition rows and summaries are served as the `mg-schemas` types
//! directly; only health and error envelopes live here.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    /// Hash of the layered config the daemon booted with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors (4xx / 5xx)
// ---------------------------------------------------------------------------

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// "INVALID_RANGE" | "INVALID_DATE" | "STORE_UNAVAILABLE"
    pub code: String,
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`. Both are kept as raw strings so a
/// malformed or missing date surfaces as `INVALID_DATE`; handlers map the
/// remaining extractor rejections (repeated keys) to the same code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpeditionParams {
    pub start: Option<String>,
    pub end: Option<String>,
}
