use std::collections::HashMap;

use tracing::trace;

use crate::model::TimingRecord;

/// Group records by the origin of their URL, preserving per-origin input
/// order. Records whose URL yields no origin cannot be attributed and are
/// skipped.
pub fn group_by_origin(records: &[TimingRecord]) -> HashMap<String, Vec<&TimingRecord>> {
    let mut groups: HashMap<String, Vec<&TimingRecord>> = HashMap::new();
    for record in records {
        let Some(origin) = record.origin() else {
            trace!(request_id = %record.request_id, url = %record.url, "record has no origin, skipping");
            continue;
        };
        groups.entry(origin).or_default().push(record);
    }
    groups
}
