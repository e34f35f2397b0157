use std::collections::HashMap;

use tracing::trace;

use crate::error::EstimateError;
use crate::metrics::{summarize_by_origin, OriginKey, Summary};
use crate::model::{ResponseTimeOptions, RttEstimateOptions, TimingRecord};

use super::rtt::estimate_rtt_by_origin;
use super::estimate_value_by_origin;

/// Estimate server-side processing time per origin, summarized: time to first
/// byte with the estimated network round trip removed.
///
/// Without a provided `rtt_by_origin`, RTT is estimated internally and each
/// origin's summary reduced to its minimum — RTT cannot be spuriously smaller
/// than the true value, while congestion and queueing pad it upward, so the
/// minimum best approximates the floor. A record whose origin has no RTT
/// entry borrows the aggregate entry instead of being dropped.
pub fn estimate_server_response_time_by_origin(
    records: &[TimingRecord],
    options: &ResponseTimeOptions,
) -> Result<HashMap<OriginKey, Summary>, EstimateError> {
    let rtt_by_origin = match &options.rtt_by_origin {
        Some(provided) => provided.clone(),
        None => estimate_rtt_by_origin(records, &RttEstimateOptions::default())?
            .into_iter()
            .map(|(key, summary)| (key, summary.min))
            .collect(),
    };

    let samples_by_origin = estimate_value_by_origin(records, |ctx| {
        let timing = ctx.timing;
        if timing.send_end < 0.0 || timing.receive_headers_end < 0.0 {
            return Vec::new();
        }
        let Some(origin) = ctx.record.origin() else {
            return Vec::new();
        };
        let rtt = rtt_by_origin
            .get(&OriginKey::Origin(origin))
            .or_else(|| rtt_by_origin.get(&OriginKey::All));
        let Some(rtt) = rtt else {
            trace!(request_id = %ctx.record.request_id, "no RTT estimate for origin, skipping");
            return Vec::new();
        };
        let ttfb = timing.receive_headers_end - timing.send_end;
        // Processing time cannot be negative; clamp any residual to zero.
        vec![(ttfb - rtt).max(0.0)]
    });

    Ok(summarize_by_origin(&samples_by_origin))
}
