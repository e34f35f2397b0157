use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::TimingRecord;

use super::grouping::group_by_origin;

/// Decide per request whether its transport connection was reused, keyed by
/// request id. The map is total over the input.
///
/// The explicit `connection_reused` field is trusted verbatim when the record
/// set actually differentiates connection ids (or has fewer than two
/// records). When every record reports the same id, the id field is plainly
/// unpopulated (commonly always `0`) and a per-origin timing heuristic takes
/// over instead.
pub fn estimate_if_connection_was_reused(records: &[TimingRecord]) -> HashMap<String, bool> {
    let connection_ids: HashSet<u64> = records.iter().map(|r| r.connection_id).collect();
    if connection_ids.len() > 1 || records.len() < 2 {
        return records
            .iter()
            .map(|r| (r.request_id.clone(), r.connection_reused.unwrap_or(false)))
            .collect();
    }

    debug!(
        records = records.len(),
        "connection ids undifferentiated, estimating reuse from timings"
    );

    let mut reused = HashMap::with_capacity(records.len());
    for group in group_by_origin(records).values() {
        // Earliest point any connection to this origin could have been freed.
        let earliest_reuse_possible = group
            .iter()
            .map(|r| r.end_time)
            .fold(f64::INFINITY, f64::min);

        for record in group {
            let judged =
                record.start_time >= earliest_reuse_possible || record.is_multiplexed();
            reused.insert(record.request_id.clone(), judged);
        }

        // The first request to an origin cannot reuse a prior connection.
        let first = group
            .iter()
            .copied()
            .reduce(|min, r| if r.start_time < min.start_time { r } else { min });
        if let Some(first) = first {
            reused.insert(first.request_id.clone(), false);
        }
    }

    // Records without an attributable origin never enter the heuristic; fall
    // back to their explicit field so the map stays total.
    for record in records {
        reused
            .entry(record.request_id.clone())
            .or_insert_with(|| record.connection_reused.unwrap_or(false));
    }

    reused
}
