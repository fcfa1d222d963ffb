//! Collapses duplicate and near-duplicate change records.
//!
//! Records are folded left to right. An incoming record is dropped when an
//! earlier one reports under the same context, or merged into an earlier
//! edited declaration with the same category and a name differing only in
//! case. The earlier entry keeps its identity and becomes `modified`.
//! Records without a context count as sharing the same (absent) one.

use tracing::debug;

use crate::differ::changes::{ChangeRecord, ChangeType, SummarizableInfo};

/// Deduplicate `records`, preserving first-seen order.
pub fn dedup(records: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
    let total = records.len();
    let mut kept: Vec<ChangeRecord> = Vec::with_capacity(total);

    for record in records {
        if kept.iter().any(|earlier| is_exact(earlier, &record)) {
            continue;
        }

        if let Some(earlier) = kept.iter_mut().find(|earlier| is_similar(earlier, &record)) {
            if let Some(SummarizableInfo::Summarizable { change_type, .. }) = &mut earlier.context {
                *change_type = ChangeType::Modified;
            }
            continue;
        }

        kept.push(record);
    }

    debug!(total, kept = kept.len(), "deduplicated change records");
    kept
}

/// Structurally equal contexts, absent ones included.
fn is_exact(earlier: &ChangeRecord, incoming: &ChangeRecord) -> bool {
    earlier.context == incoming.context
}

fn is_similar(earlier: &ChangeRecord, incoming: &ChangeRecord) -> bool {
    match (&earlier.context, &incoming.context) {
        (Some(earlier @ SummarizableInfo::Summarizable { .. }), Some(incoming)) => {
            earlier.is_similar(incoming)
        }
        _ => false,
    }
}
