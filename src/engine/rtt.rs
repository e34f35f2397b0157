//! RTT estimation strategies, ordered by reliability.
//!
//! Handshake phases give the most direct RTT measurement; when no record in
//! the set exposes one, two coarser strategies (download throughput and
//! send-start delay) stand in, scaled down by a correction multiplier.

use std::collections::HashMap;

use tracing::debug;

use crate::error::EstimateError;
use crate::metrics::{summarize_by_origin, OriginKey, Summary};
use crate::model::{RttEstimateOptions, TimingRecord};

use super::{estimate_value_by_origin, EstimateContext};

/// One initial TCP congestion window, in bytes. Transfers at or below this
/// size complete in a single burst and carry no bandwidth signal.
pub const INITIAL_CWND_BYTES: u64 = 14 * 1024;

/// Most reliable strategy: read RTT straight off the TCP/TLS handshake
/// phases. Inapplicable to reused connections, where no handshake happened.
fn rtt_via_handshake(ctx: &EstimateContext) -> Vec<f64> {
    if ctx.connection_reused {
        return Vec::new();
    }
    let timing = ctx.timing;
    if timing.ssl_start > 0.0 && timing.ssl_end > 0.0 {
        // TLS and TCP handshakes observed separately: attribute one RTT
        // sample to each.
        vec![
            timing.connect_end - timing.ssl_start,
            timing.ssl_start - timing.connect_start,
        ]
    } else if timing.connect_start >= 0.0 && timing.connect_end > 0.0 {
        vec![timing.connect_end - timing.connect_start]
    } else {
        Vec::new()
    }
}

/// Coarse fallback: infer RTT from how long the body took to download after
/// the first byte, assuming the congestion window doubles every round trip
/// starting from one initial window.
fn rtt_via_download_timing(ctx: &EstimateContext) -> Vec<f64> {
    if ctx.connection_reused {
        return Vec::new();
    }
    // At or below one congestion window there is nothing to infer from.
    if ctx.record.transfer_size <= INITIAL_CWND_BYTES {
        return Vec::new();
    }
    let timing = ctx.timing;
    if timing.receive_headers_end < 0.0 {
        return Vec::new();
    }

    let total_ms = (ctx.record.end_time - ctx.record.start_time) * 1000.0;
    let download_after_first_byte = total_ms - timing.receive_headers_end;
    let round_trips = (ctx.record.transfer_size as f64 / INITIAL_CWND_BYTES as f64).log2();
    vec![download_after_first_byte / round_trips]
}

/// Coarse fallback: the delay before the request could be sent covers one
/// round trip, or two when TLS had to be negotiated first.
fn rtt_via_send_start(ctx: &EstimateContext) -> Vec<f64> {
    if ctx.connection_reused {
        return Vec::new();
    }
    let timing = ctx.timing;
    if timing.send_start < 0.0 {
        return Vec::new();
    }

    let mut round_trips = 1.0;
    if ctx.record.is_secure() {
        round_trips += 1.0;
    }
    vec![timing.send_start / round_trips]
}

/// Estimate RTT per origin, summarized, with one `OriginKey::All` entry over
/// every sample.
///
/// The handshake strategy runs first. When it yields no origins at all, or
/// `force_coarse_estimates` is set, its result is discarded and the two
/// coarse strategies are merged per origin, every coarse sample scaled by
/// `coarse_estimate_multiplier`. `EstimateError::NoTimingData` when no origin
/// has a single sample after all strategies.
pub fn estimate_rtt_by_origin(
    records: &[TimingRecord],
    options: &RttEstimateOptions,
) -> Result<HashMap<OriginKey, Summary>, EstimateError> {
    let mut samples_by_origin = if options.force_coarse_estimates {
        debug!("coarse RTT estimates forced");
        HashMap::new()
    } else {
        estimate_value_by_origin(records, rtt_via_handshake)
    };

    if samples_by_origin.is_empty() {
        if !options.force_coarse_estimates {
            debug!("no handshake timings available, falling back to coarse RTT estimates");
        }
        let mut coarse = estimate_value_by_origin(records, rtt_via_download_timing);
        for (origin, samples) in estimate_value_by_origin(records, rtt_via_send_start) {
            coarse.entry(origin).or_default().extend(samples);
        }
        for samples in coarse.values_mut() {
            for sample in samples.iter_mut() {
                *sample *= options.coarse_estimate_multiplier;
            }
        }
        samples_by_origin = coarse;
    }

    if samples_by_origin.is_empty() {
        return Err(EstimateError::NoTimingData);
    }
    Ok(summarize_by_origin(&samples_by_origin))
}
