use thiserror::Error;

/// Failure modes of the estimation entry points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    /// Every fallback strategy ran and not one origin yielded a sample.
    /// There is no partial or degraded RTT result; callers must treat this
    /// as fatal for the analysis pass.
    #[error("no timing information available in the provided records")]
    NoTimingData,
}
