//! mg-expedition
//!
//! Delivery expedition status model:
//! - Evaluator: contract state -> blocked / released verdict with reason code
//! - Date window: inclusive `[start, end]`, parsed from ISO 8601 dates
//! - Query service: one store read, window filter, stable ordering, evaluation
//! - Summary: dashboard counters over a projection
//!
//! The evaluator is pure. The query service performs exactly one read against
//! a [`ContractStore`] per call and never caches verdicts.

mod error;
mod evaluator;
mod query;
mod store;
mod window;

pub use error::ExpeditionError;
pub use evaluator::{evaluate, evaluate_candidate, ContractGate};
pub use query::{expedition_items, project, summarize};
pub use store::{ContractStore, InMemoryContractStore};
pub use window::{today_in, DateWindow, DEFAULT_WINDOW_DAYS};

pub use mg_schemas::{
    DeliveryBlockedReason, DeliveryCandidate, ExpeditionItem, ExpeditionSummary,
    ScheduledDeliveryItem, Verdict,
};
