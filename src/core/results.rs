use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed request attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct URLValidation {
    pub url: String,
    pub status_code: u16,
    #[serde(with = "duration_nanos")]
    pub response_time: Duration,
    pub content_length: u64,
    pub content_type: String,
    pub links_found: usize,
    pub depth: u32,
    pub is_valid: bool,
    pub error: Option<String>,
}

/// One failed request attempt: no response was received at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub url: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
    pub depth: u32,
}

/// One successful HTTP response's timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseTimeEntry {
    pub url: String,
    #[serde(with = "duration_nanos")]
    pub duration: Duration,
    pub timestamp: DateTime<Utc>,
}

/// A response whose round-trip exceeded the slow-request threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowRequest {
    pub url: String,
    #[serde(with = "duration_nanos")]
    pub duration: Duration,
    pub status_code: u16,
}

/// The engine's complete output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResults {
    #[serde(with = "duration_human")]
    pub duration: Duration,
    pub urls_discovered: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    #[serde(with = "duration_human")]
    pub average_response_time: Duration,
    #[serde(with = "duration_human")]
    pub min_response_time: Duration,
    #[serde(with = "duration_human")]
    pub max_response_time: Duration,
    #[serde(with = "duration_human")]
    pub p95_response_time: Duration,
    #[serde(with = "duration_human")]
    pub p99_response_time: Duration,
    pub requests_per_second: f64,
    pub success_rate: f64,
    pub url_validations: Vec<URLValidation>,
    pub errors: Vec<ErrorInfo>,
    pub slow_requests: Vec<SlowRequest>,
    pub response_times: Vec<ResponseTimeEntry>,
    /// Populated by an external collaborator (performance-target evaluation
    /// is out of scope for this crate); left `None` at construction.
    pub performance_validation: Option<serde_json::Value>,
}

impl TestResults {
    pub fn empty() -> Self {
        Self {
            duration: Duration::ZERO,
            urls_discovered: 0,
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            average_response_time: Duration::ZERO,
            min_response_time: Duration::ZERO,
            max_response_time: Duration::ZERO,
            p95_response_time: Duration::ZERO,
            p99_response_time: Duration::ZERO,
            requests_per_second: 0.0,
            success_rate: 0.0,
            url_validations: Vec::new(),
            errors: Vec::new(),
            slow_requests: Vec::new(),
            response_times: Vec::new(),
            performance_validation: None,
        }
    }
}

/// Per-entry durations serialize as signed nanosecond integers.
mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.as_nanos() as i64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let nanos = i64::deserialize(d)?;
        Ok(Duration::from_nanos(nanos.max(0) as u64))
    }
}

/// Top-level summary durations serialize as human-readable strings, e.g.
/// `"150ms"`.
mod duration_human {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&humantime::format_duration(*d).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(d)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
