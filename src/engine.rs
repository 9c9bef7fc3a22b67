//! The orchestrator: owns the queue and lifecycle, starts the worker pool
//! and aggregator, seeds the queue with the base URL, and finalizes
//! statistics once the run's context is cancelled and everything has
//! drained.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use url::Url;

use crate::aggregator::{self, DrainedLists};
use crate::config::TesterConfig;
use crate::config::defaults;
use crate::core::error::EngineError;
use crate::core::results::TestResults;
use crate::crawler::Crawler;
use crate::network::client::build_client;
use crate::network::rate_limit::RateLimiter;
use crate::network::robots::{self, RobotsRuleSet};
use crate::queue::URLQueue;
use crate::stats::{self, Snapshot};
use crate::worker::{self, Counters, WorkerContext};

/// Lifecycle state of a single `Engine::run` call. Linear, no restart: a
/// new state machine starts with every `Engine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Fresh,
    Running,
    Draining,
    Finalizing,
    Done,
}

/// The crawl/load-test engine. Constructed once per run; `run` consumes
/// `self` because concurrent or repeated calls are undefined.
pub struct Engine {
    config: Arc<TesterConfig>,
    base: Url,
    client: reqwest::Client,
    crawler: Arc<Crawler>,
    rate_limiter: Arc<RateLimiter>,
    queue: Arc<URLQueue>,
}

impl Engine {
    /// Validates `config` and builds every read-only collaborator the
    /// worker pool will share. Fatal configuration errors surface here,
    /// before any work starts.
    pub fn new(config: TesterConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let base = Url::parse(&config.base_url)?;
        let client = build_client(&config)?;
        let crawler = Arc::new(Crawler::new(&base, config.max_depth));
        let rate_limiter = Arc::new(RateLimiter::new(config.rate));
        let queue = Arc::new(URLQueue::new(config.queue_size));

        Ok(Self {
            config: Arc::new(config),
            base,
            client,
            crawler,
            rate_limiter,
            queue,
        })
    }

    /// Runs the engine for `config.duration`, then finalizes statistics.
    /// Equivalent to `run_with_cancellation` against a token this call
    /// cancels internally once the configured duration elapses.
    pub async fn run(self) -> Result<TestResults, EngineError> {
        let cancel = CancellationToken::new();
        let duration = self.config.duration;
        let timer_cancel = cancel.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            timer_cancel.cancel();
        });

        let result = self.run_with_cancellation(cancel).await;
        timer.abort();
        result
    }

    /// Runs the engine until `cancel` fires. Exposed separately from `run`
    /// so callers needing deterministic termination (tests, an enclosing
    /// process signal handler) can supply their own cancellation source
    /// instead of `config.duration`'s timer.
    #[instrument(skip_all, fields(base = %self.base))]
    pub async fn run_with_cancellation(
        self,
        cancel: CancellationToken,
    ) -> Result<TestResults, EngineError> {
        let start = Instant::now();
        info!(state = ?EngineState::Running, "engine starting");

        let robots = if self.config.ignore_robots {
            RobotsRuleSet::allow_all()
        } else {
            robots::fetch_and_parse(&self.client, &self.base, &self.config.user_agent).await?
        };
        let robots = Arc::new(robots);

        let (metrics, aggregator_rx) = aggregator::channel();
        let aggregator_handle = tokio::spawn(aggregator_rx.run());

        let mut worker_handles = Vec::with_capacity(self.config.concurrency);
        let counters = Arc::new(Counters::default());
        for _ in 0..self.config.concurrency {
            let ctx = WorkerContext {
                client: self.client.clone(),
                base: self.base.clone(),
                config: Arc::clone(&self.config),
                crawler: Arc::clone(&self.crawler),
                queue: Arc::clone(&self.queue),
                rate_limiter: Arc::clone(&self.rate_limiter),
                robots: Arc::clone(&robots),
                metrics: metrics.clone(),
                counters: Arc::clone(&counters),
                cancel: cancel.clone(),
            };
            worker_handles.push(tokio::spawn(worker::run(ctx)));
        }
        // Drop the orchestrator's own handle so the aggregator sees the
        // channel close once every worker has exited.
        drop(metrics);

        let seed_outcome = self
            .crawler
            .add_url(self.base.as_str(), 0, &self.base, &self.queue)
            .await;
        info!(outcome = ?seed_outcome, "seeded queue with base url");

        let progress_cancel = cancel.clone();
        let progress_counters = Arc::clone(&counters);
        let progress_discovered = Arc::clone(&self.crawler);
        let progress = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(defaults::PROGRESS_TICK_INTERVAL);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let (total, successful, failed) = progress_counters.snapshot();
                        info!(
                            total_requests = total,
                            successful_requests = successful,
                            failed_requests = failed,
                            urls_discovered = progress_discovered.discovered().count(),
                            "progress"
                        );
                    }
                    _ = progress_cancel.cancelled() => return,
                }
            }
        });

        cancel.cancelled().await;
        info!(state = ?EngineState::Draining, "context cancelled, draining");

        self.queue.close().await;
        for handle in worker_handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "worker task panicked");
            }
        }
        progress.abort();

        let lists: DrainedLists = match aggregator_handle.await {
            Ok(lists) => lists,
            Err(e) => {
                warn!(error = %e, "aggregator task panicked; finalizing with partial results");
                DrainedLists::default()
            }
        };

        info!(state = ?EngineState::Finalizing, "finalizing statistics");
        let (total, successful, failed) = counters.snapshot();
        let snapshot = Snapshot {
            url_validations: lists.url_validations,
            errors: lists.errors,
            response_times: lists.response_times,
            slow_requests: lists.slow_requests,
            urls_discovered: self.crawler.discovered().count(),
            total_requests: total,
            successful_requests: successful,
            failed_requests: failed,
            wall_clock: start.elapsed(),
        };
        let results = stats::finalize(snapshot);
        info!(state = ?EngineState::Done, total_requests = results.total_requests, "engine finished");
        Ok(results)
    }
}
