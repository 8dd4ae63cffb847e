use std::collections::BTreeMap;

use mg_schemas::{DeliveryCandidate, ExpeditionItem, ExpeditionSummary};
use tracing::debug;

use crate::{evaluate_candidate, ContractStore, DateWindow, ExpeditionError};

/// Expedition panel query: one store read, then [`project`].
///
/// Returns an empty vector (not an error) when nothing is scheduled in the
/// window. Store failures surface as [`ExpeditionError::Store`].
pub async fn expedition_items(
    store: &dyn ContractStore,
    window: &DateWindow,
) -> Result<Vec<ExpeditionItem>, ExpeditionError> {
    let candidates = store.fetch_candidates(window).await?;
    debug!(
        source = store.source_name(),
        start = %window.start(),
        end = %window.end(),
        candidates = candidates.len(),
        "expedition candidates fetched"
    );
    Ok(project(window, candidates))
}

/// Filter to `window`, order by (scheduled date, id) and attach verdicts.
///
/// The filter and sort are re-applied here so the result does not depend on
/// how carefully a store honours the window or orders its rows.
pub fn project(
    window: &DateWindow,
    candidates: impl IntoIterator<Item = DeliveryCandidate>,
) -> Vec<ExpeditionItem> {
    let mut in_window: Vec<DeliveryCandidate> = candidates
        .into_iter()
        .filter(|c| window.contains(c.item.scheduled_delivery_date))
        .collect();

    in_window.sort_by(|a, b| {
        a.item
            .scheduled_delivery_date
            .cmp(&b.item.scheduled_delivery_date)
            .then(a.item.id.cmp(&b.item.id))
    });

    in_window
        .into_iter()
        .map(|c| {
            let verdict = evaluate_candidate(&c);
            ExpeditionItem {
                item: c.item,
                verdict,
            }
        })
        .collect()
}

/// Dashboard counters over an already-projected window.
pub fn summarize(window: &DateWindow, items: &[ExpeditionItem]) -> ExpeditionSummary {
    let mut blocked_by_reason: BTreeMap<String, usize> = BTreeMap::new();
    for reason in items.iter().filter_map(|i| i.reason()) {
        *blocked_by_reason.entry(reason.as_str().to_string()).or_default() += 1;
    }

    let blocked = items.iter().filter(|i| i.is_blocked()).count();

    ExpeditionSummary {
        start: window.start(),
        end: window.end(),
        total: items.len(),
        released: items.len() - blocked,
        blocked,
        blocked_by_reason,
    }
}
