use std::fmt;
use std::time::Duration;

/// Probes at or above this latency are DOWN even with a 2xx status.
pub const LATENCY_THRESHOLD_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Up,
    Down,
}

impl Status {
    /// UP iff the status code is 2xx and the latency is strictly below the threshold.
    /// A missing status code means the request never got a response.
    pub fn classify(http_status: Option<u16>, latency: Duration) -> Self {
        let latency_ms = latency.as_secs_f64() * 1000.0;
        match http_status {
            Some(code) if code / 100 == 2 && latency_ms < LATENCY_THRESHOLD_MS => Status::Up,
            _ => Status::Down,
        }
    }

    pub fn is_up(self) -> bool {
        self == Status::Up
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Up => f.write_str("UP"),
            Status::Down => f.write_str("DOWN"),
        }
    }
}

/// Outcome of probing one endpoint once.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub url: String,
    pub domain: String,
    pub http_status: Option<u16>,
    pub latency: Duration,
    pub status: Status,
    /// Flattened transport error, if the request failed.
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.0
    }
}
