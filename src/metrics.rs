//! Statistical summaries over per-origin sample collections.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key of a summarized mapping: either one concrete origin or the reserved
/// aggregate entry. An enum variant rather than a magic string, so the
/// aggregate can never collide with a real origin and callers never compare
/// strings to tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OriginKey {
    /// Combined entry over the union of every origin's samples.
    All,
    /// A single scheme+host+port origin.
    Origin(String),
}

/// {min, max, avg, median} over one non-empty sample collection, in
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
}

impl Summary {
    /// Compute summary metrics from samples; `None` on an empty collection.
    /// Upstream filtering drops empty origins, so callers normally never see
    /// `None`.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let n = sorted.len();
        let avg = sorted.iter().sum::<f64>() / n as f64;
        // Lower median: deterministic for even-length input, no interpolation.
        let median = sorted[(n - 1) / 2];
        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            avg,
            median,
        })
    }
}

/// Summarize each origin's samples, plus one `OriginKey::All` entry over the
/// union of every collection.
pub fn summarize_by_origin(
    samples_by_origin: &HashMap<String, Vec<f64>>,
) -> HashMap<OriginKey, Summary> {
    let mut summaries = HashMap::with_capacity(samples_by_origin.len() + 1);
    let mut all = Vec::new();
    for (origin, samples) in samples_by_origin {
        all.extend_from_slice(samples);
        if let Some(summary) = Summary::from_samples(samples) {
            summaries.insert(OriginKey::Origin(origin.clone()), summary);
        }
    }
    if let Some(summary) = Summary::from_samples(&all) {
        summaries.insert(OriginKey::All, summary);
    }
    summaries
}
