//! Statistics finalization: wall-clock duration, response-time percentiles,
//! throughput, and success rate, computed once from a snapshot of whatever
//! the aggregator collected during the run.

use std::time::Duration;

use crate::core::results::{ErrorInfo, ResponseTimeEntry, SlowRequest, TestResults, URLValidation};

/// Everything the aggregator drained, handed to `finalize` as a snapshot.
/// Finalization never mutates these lists in place; it sorts copies.
pub struct Snapshot {
    pub url_validations: Vec<URLValidation>,
    pub errors: Vec<ErrorInfo>,
    pub response_times: Vec<ResponseTimeEntry>,
    pub slow_requests: Vec<SlowRequest>,
    pub urls_discovered: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub wall_clock: Duration,
}

/// Computes `TestResults` from a snapshot. Idempotent: calling this twice
/// with the same snapshot (or a clone of it) produces identical results.
pub fn finalize(snapshot: Snapshot) -> TestResults {
    let mut durations: Vec<Duration> = snapshot
        .response_times
        .iter()
        .map(|entry| entry.duration)
        .collect();
    durations.sort();

    let k = durations.len();
    let min = durations.first().copied().unwrap_or(Duration::ZERO);
    let max = durations.last().copied().unwrap_or(Duration::ZERO);
    let mean = if k > 0 {
        durations.iter().sum::<Duration>() / k as u32
    } else {
        Duration::ZERO
    };
    let p95 = percentile(&durations, 0.95);
    let p99 = percentile(&durations, 0.99);

    let seconds = snapshot.wall_clock.as_secs_f64();
    let throughput = if seconds > 0.0 {
        snapshot.total_requests as f64 / seconds
    } else {
        0.0
    };

    let success_rate = if snapshot.total_requests > 0 {
        snapshot.successful_requests as f64 / snapshot.total_requests as f64 * 100.0
    } else {
        0.0
    };

    let mut slow_requests = snapshot.slow_requests;
    slow_requests.sort_by(|a, b| b.duration.cmp(&a.duration));

    TestResults {
        duration: snapshot.wall_clock,
        urls_discovered: snapshot.urls_discovered,
        total_requests: snapshot.total_requests,
        successful_requests: snapshot.successful_requests,
        failed_requests: snapshot.failed_requests,
        average_response_time: mean,
        min_response_time: min,
        max_response_time: max,
        p95_response_time: p95,
        p99_response_time: p99,
        requests_per_second: throughput,
        success_rate,
        url_validations: snapshot.url_validations,
        errors: snapshot.errors,
        slow_requests,
        response_times: snapshot.response_times,
        performance_validation: None,
    }
}

/// `index = floor(fraction * K)` clamped to `K - 1`.
fn percentile(sorted: &[Duration], fraction: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((fraction * sorted.len() as f64) as usize).min(sorted.len() - 1);
    sorted[idx]
}
