//! The estimation engine: connection-reuse judgment, per-origin grouping,
//! and the RTT and server response-time estimators built on top of them.

mod connection_reuse;
mod grouping;
mod response_time;
mod rtt;

pub use connection_reuse::estimate_if_connection_was_reused;
pub use grouping::group_by_origin;
pub use response_time::estimate_server_response_time_by_origin;
pub use rtt::{estimate_rtt_by_origin, INITIAL_CWND_BYTES};

use std::collections::HashMap;

use crate::model::{TimingPhases, TimingRecord};

/// Per-record context handed to an estimation strategy.
pub(crate) struct EstimateContext<'a> {
    pub record: &'a TimingRecord,
    pub timing: &'a TimingPhases,
    pub connection_reused: bool,
}

/// Run one estimation strategy across all records, attributing its samples to
/// their origins. Connection reuse is computed once up front. Records without
/// a `timing` sub-record contribute nothing, a strategy may produce zero, one,
/// or several samples per record, and origins that collect no samples are
/// omitted entirely.
pub(crate) fn estimate_value_by_origin<F>(
    records: &[TimingRecord],
    mut iteratee: F,
) -> HashMap<String, Vec<f64>>
where
    F: FnMut(&EstimateContext) -> Vec<f64>,
{
    let reused_by_request = estimate_if_connection_was_reused(records);

    let mut samples_by_origin = HashMap::new();
    for (origin, group) in group_by_origin(records) {
        let mut samples = Vec::new();
        for record in group {
            let Some(timing) = record.timing.as_ref() else {
                continue;
            };
            let connection_reused = reused_by_request
                .get(&record.request_id)
                .copied()
                .unwrap_or(false);
            samples.extend(iteratee(&EstimateContext {
                record,
                timing,
                connection_reused,
            }));
        }
        if !samples.is_empty() {
            samples_by_origin.insert(origin, samples);
        }
    }
    samples_by_origin
}
