use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use crate::metrics::OriginKey;

/// Timing phases of one request, in milliseconds relative to the request
/// start. `-1.0` marks a phase that did not occur for this request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimingPhases {
    pub connect_start: f64,
    pub connect_end: f64,
    pub ssl_start: f64,
    pub ssl_end: f64,
    pub send_start: f64,
    pub send_end: f64,
    pub receive_headers_end: f64,
}

impl Default for TimingPhases {
    fn default() -> Self {
        Self {
            connect_start: -1.0,
            connect_end: -1.0,
            ssl_start: -1.0,
            ssl_end: -1.0,
            send_start: -1.0,
            send_end: -1.0,
            receive_headers_end: -1.0,
        }
    }
}

/// One recorded HTTP/HTTPS transaction, as produced by an external
/// network-log parser. Records without a `timing` sub-record carry too little
/// information to estimate anything and are skipped by every estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingRecord {
    pub request_id: String,
    /// Absolute URL; the origin (scheme+host+port) is the unit of
    /// aggregation.
    pub url: String,
    /// Transport-connection identifier. Not always populated by the capture
    /// side; see `estimate_if_connection_was_reused`.
    #[serde(default)]
    pub connection_id: u64,
    /// Explicit reuse signal from the capture side, trusted only when
    /// connection ids are actually differentiated.
    #[serde(default)]
    pub connection_reused: Option<bool>,
    #[serde(default)]
    pub protocol: String,
    /// Wall-clock seconds.
    pub start_time: f64,
    /// Wall-clock seconds.
    pub end_time: f64,
    #[serde(default)]
    pub transfer_size: u64,
    #[serde(default)]
    pub timing: Option<TimingPhases>,
}

impl TimingRecord {
    /// Origin of this record's URL as a scheme+host+port string, or `None`
    /// when the URL does not parse to a tuple origin (e.g. `data:` URLs).
    pub fn origin(&self) -> Option<String> {
        let parsed = Url::parse(&self.url).ok()?;
        let origin = parsed.origin();
        origin.is_tuple().then(|| origin.ascii_serialization())
    }

    pub fn is_secure(&self) -> bool {
        Url::parse(&self.url)
            .map(|u| u.scheme() == "https")
            .unwrap_or(false)
    }

    /// Whether the protocol multiplexes requests over one connection, so no
    /// request after the first ever needs a fresh handshake.
    pub fn is_multiplexed(&self) -> bool {
        matches!(self.protocol.as_str(), "h2" | "h2c" | "h3")
    }
}

/// Options for `estimate_rtt_by_origin`. Construct with `Default` and
/// override fields explicitly; there are no module-level defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RttEstimateOptions {
    /// Skip the handshake strategy even when it would yield samples.
    pub force_coarse_estimates: bool,
    /// Correction applied to every coarse sample; the indirect strategies
    /// systematically overestimate.
    pub coarse_estimate_multiplier: f64,
}

impl Default for RttEstimateOptions {
    fn default() -> Self {
        Self {
            force_coarse_estimates: false,
            coarse_estimate_multiplier: 0.5,
        }
    }
}

/// Options for `estimate_server_response_time_by_origin`.
#[derive(Debug, Clone, Default)]
pub struct ResponseTimeOptions {
    /// Precomputed origin -> RTT map (milliseconds). When absent, RTT is
    /// estimated internally and each origin's summary is reduced to its
    /// minimum.
    pub rtt_by_origin: Option<HashMap<OriginKey, f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, protocol: &str) -> TimingRecord {
        TimingRecord {
            request_id: "1".into(),
            url: url.into(),
            connection_id: 0,
            connection_reused: None,
            protocol: protocol.into(),
            start_time: 0.0,
            end_time: 1.0,
            transfer_size: 0,
            timing: None,
        }
    }

    #[test]
    fn origin_is_scheme_host_port() {
        let r = record("https://example.com:8443/index.html?q=1", "http/1.1");
        assert_eq!(r.origin().as_deref(), Some("https://example.com:8443"));

        let r = record("https://example.com/index.html", "http/1.1");
        assert_eq!(r.origin().as_deref(), Some("https://example.com"));
    }

    #[test]
    fn origin_of_unparseable_url_is_none() {
        assert_eq!(record("not a url", "http/1.1").origin(), None);
        assert_eq!(record("data:text/plain,hi", "http/1.1").origin(), None);
    }

    #[test]
    fn multiplexed_protocols() {
        assert!(record("https://a.com/", "h2").is_multiplexed());
        assert!(record("https://a.com/", "h3").is_multiplexed());
        assert!(!record("https://a.com/", "http/1.1").is_multiplexed());
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let json = r#"{
            "requestId": "42",
            "url": "https://example.com/",
            "protocol": "h2",
            "startTime": 1.5,
            "endTime": 2.0,
            "transferSize": 20000,
            "timing": {"sendStart": 10.0, "sendEnd": 12.0, "receiveHeadersEnd": 40.0}
        }"#;
        let r: TimingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.request_id, "42");
        assert_eq!(r.connection_id, 0);
        assert_eq!(r.connection_reused, None);
        let t = r.timing.unwrap();
        assert_eq!(t.send_start, 10.0);
        // Phases absent from the input read as not-applicable.
        assert_eq!(t.connect_start, -1.0);
        assert_eq!(t.ssl_end, -1.0);
    }
}
