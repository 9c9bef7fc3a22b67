//! Single-consumer fan-in for the four metric lists. Workers
//! hold clones of [`MetricsHandle`] and send into bounded channels; the
//! aggregator is the sole writer of the result lists, which eliminates
//! contention on the hot path. Counters (`TotalRequests`, `SuccessfulRequests`,
//! `FailedRequests`) are atomics updated directly by workers, not routed
//! through this channel, because they are frequent and monotonic.

use tokio::sync::mpsc;

use crate::core::results::{ErrorInfo, ResponseTimeEntry, SlowRequest, URLValidation};

/// Channel capacity large enough that sends rarely block; if they do,
/// backpressure onto the worker is acceptable.
const CHANNEL_CAPACITY: usize = 65_536;

/// Cloned into every worker; dropping the last clone lets the aggregator
/// observe a closed channel and exit.
#[derive(Clone)]
pub struct MetricsHandle {
    validations: mpsc::Sender<URLValidation>,
    errors: mpsc::Sender<ErrorInfo>,
    response_times: mpsc::Sender<ResponseTimeEntry>,
    slow_requests: mpsc::Sender<SlowRequest>,
}

impl MetricsHandle {
    pub async fn send_validation(&self, entry: URLValidation) {
        let _ = self.validations.send(entry).await;
    }

    pub async fn send_error(&self, entry: ErrorInfo) {
        let _ = self.errors.send(entry).await;
    }

    pub async fn send_response_time(&self, entry: ResponseTimeEntry) {
        let _ = self.response_times.send(entry).await;
    }

    pub async fn send_slow_request(&self, entry: SlowRequest) {
        let _ = self.slow_requests.send(entry).await;
    }
}

/// Lists drained from the four channels, ready to be folded into
/// `TestResults` by [`crate::stats::finalize`].
#[derive(Default)]
pub struct DrainedLists {
    pub url_validations: Vec<URLValidation>,
    pub errors: Vec<ErrorInfo>,
    pub response_times: Vec<ResponseTimeEntry>,
    pub slow_requests: Vec<SlowRequest>,
}

pub struct Aggregator {
    validations_rx: mpsc::Receiver<URLValidation>,
    errors_rx: mpsc::Receiver<ErrorInfo>,
    response_times_rx: mpsc::Receiver<ResponseTimeEntry>,
    slow_requests_rx: mpsc::Receiver<SlowRequest>,
}

/// Builds the sender handle and the aggregator's receiving half.
pub fn channel() -> (MetricsHandle, Aggregator) {
    let (validations_tx, validations_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (errors_tx, errors_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (response_times_tx, response_times_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (slow_requests_tx, slow_requests_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = MetricsHandle {
        validations: validations_tx,
        errors: errors_tx,
        response_times: response_times_tx,
        slow_requests: slow_requests_tx,
    };
    let aggregator = Aggregator {
        validations_rx,
        errors_rx,
        response_times_rx,
        slow_requests_rx,
    };
    (handle, aggregator)
}

impl Aggregator {
    /// Drains all four channels until every sender has been dropped (i.e.
    /// every worker has exited). Order of interleaving across lists is
    /// unspecified; each individual list preserves send order.
    pub async fn run(mut self) -> DrainedLists {
        let mut lists = DrainedLists::default();
        let mut validations_open = true;
        let mut errors_open = true;
        let mut response_times_open = true;
        let mut slow_requests_open = true;

        while validations_open || errors_open || response_times_open || slow_requests_open {
            tokio::select! {
                msg = self.validations_rx.recv(), if validations_open => {
                    match msg {
                        Some(entry) => lists.url_validations.push(entry),
                        None => validations_open = false,
                    }
                }
                msg = self.errors_rx.recv(), if errors_open => {
                    match msg {
                        Some(entry) => lists.errors.push(entry),
                        None => errors_open = false,
                    }
                }
                msg = self.response_times_rx.recv(), if response_times_open => {
                    match msg {
                        Some(entry) => lists.response_times.push(entry),
                        None => response_times_open = false,
                    }
                }
                msg = self.slow_requests_rx.recv(), if slow_requests_open => {
                    match msg {
                        Some(entry) => lists.slow_requests.push(entry),
                        None => slow_requests_open = false,
                    }
                }
            }
        }

        lists
    }
}
