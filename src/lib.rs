//! Per-origin network timing estimation.
//!
//! Given recorded HTTP/HTTPS transaction timings captured during a page
//! load, this crate derives round-trip-time and server response-time
//! estimates per origin and aggregates them into statistical summaries. The
//! estimates feed downstream network-performance simulation; the records
//! themselves come from an external network-log parser. Everything here is
//! synchronous, pure computation — no I/O, no state between calls.

pub mod engine;
pub mod error;
pub mod metrics;
pub mod model;

pub use engine::{
    estimate_if_connection_was_reused, estimate_rtt_by_origin,
    estimate_server_response_time_by_origin, group_by_origin, INITIAL_CWND_BYTES,
};
pub use error::EstimateError;
pub use metrics::{summarize_by_origin, OriginKey, Summary};
pub use model::{ResponseTimeOptions, RttEstimateOptions, TimingPhases, TimingRecord};
