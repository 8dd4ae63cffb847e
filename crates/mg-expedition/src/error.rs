use chrono::NaiveDate;
use thiserror::Error;

/// Failures surfaced by the expedition query path.
///
/// `InvalidRange` and `InvalidDate` are caller mistakes; `Store` means the
/// contract store could not be read and is not retried here.
#[derive(Debug, Error)]
pub enum ExpeditionError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid date for '{field}': '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("contract store unavailable: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl ExpeditionError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ExpeditionError::InvalidRange { .. } => "INVALID_RANGE",
            ExpeditionError::InvalidDate { .. } => "INVALID_DATE",
            ExpeditionError::Store(_) => "STORE_UNAVAILABLE",
        }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, ExpeditionError::Store(_))
    }
}
