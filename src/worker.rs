//! One concurrent thread of request execution. A worker pulls tasks from
//! the shared queue until it is closed and drained or the run is
//! cancelled, consulting the robots gate and rate limiter before every
//! request and feeding discovered children back into the crawler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::header;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::aggregator::MetricsHandle;
use crate::config::{defaults, AuthConfig, TesterConfig};
use crate::core::results::{ErrorInfo, ResponseTimeEntry, SlowRequest, URLValidation};
use crate::crawler::{extract_links, Crawler};
use crate::network::rate_limit::RateLimiter;
use crate::network::retry::{execute_with_retry, RetryError};
use crate::network::robots::RobotsRuleSet;
use crate::queue::URLQueue;
use crate::util::Sanitizer;

/// Atomic counters shared by every worker and read by the orchestrator at
/// finalization. `TotalRequests` is incremented before the corresponding
/// success/failure counter, so it may momentarily exceed their sum while
/// requests are in flight.
#[derive(Default)]
pub struct Counters {
    pub total: AtomicU64,
    pub successful: AtomicU64,
    pub failed: AtomicU64,
}

impl Counters {
    pub fn snapshot(&self) -> (u64, u64, u64) {
        (
            self.total.load(Ordering::Relaxed),
            self.successful.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

/// Read-only resources shared by the whole worker pool, built once by the
/// orchestrator.
pub struct WorkerContext {
    pub client: reqwest::Client,
    pub base: Url,
    pub config: Arc<TesterConfig>,
    pub crawler: Arc<Crawler>,
    pub queue: Arc<URLQueue>,
    pub rate_limiter: Arc<RateLimiter>,
    pub robots: Arc<RobotsRuleSet>,
    pub metrics: MetricsHandle,
    pub counters: Arc<Counters>,
    pub cancel: CancellationToken,
}

/// Runs the worker loop until the queue is closed and drained or `cancel`
/// fires. Returns when there is nothing left to do.
pub async fn run(ctx: WorkerContext) {
    loop {
        if ctx.cancel.is_cancelled() {
            return;
        }

        let task = tokio::select! {
            task = ctx.queue.recv() => task,
            _ = ctx.cancel.cancelled() => return,
        };
        let Some(task) = task else {
            return;
        };

        let path = request_path(&task.url);
        if !ctx.robots.is_allowed(&path) {
            ctx.counters.total.fetch_add(1, Ordering::Relaxed);
            record_failure(&ctx, &task.url, task.depth, "disallowed by robots").await;
            continue;
        }

        if ctx.rate_limiter.wait(&ctx.cancel).await.is_err() {
            ctx.counters.total.fetch_add(1, Ordering::Relaxed);
            record_failure(&ctx, &task.url, task.depth, "rate limiter wait cancelled").await;
            continue;
        }

        let start = Instant::now();
        ctx.counters.total.fetch_add(1, Ordering::Relaxed);

        let client = &ctx.client;
        let url = task.url.clone();
        let user_agent = ctx.config.user_agent.clone();
        let auth = ctx.config.auth.clone();
        let build = move || apply_auth(client.get(url.as_str()), &user_agent, auth.as_ref());

        let response = match execute_with_retry(build, &ctx.cancel, ctx.config.respect_429).await {
            Ok(resp) => resp,
            Err(err) => {
                let message = match err {
                    RetryError::Network(e) => e.to_string(),
                    RetryError::Cancelled => "request cancelled".to_string(),
                };
                ctx.counters.failed.fetch_add(1, Ordering::Relaxed);
                emit_error(&ctx, &task.url, task.depth, &message).await;
                continue;
            }
        };

        let response_time = start.elapsed();
        ctx.counters.successful.fetch_add(1, Ordering::Relaxed);
        ctx.metrics
            .send_response_time(ResponseTimeEntry {
                url: task.url.clone(),
                duration: response_time,
                timestamp: Utc::now(),
            })
            .await;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let content_length = response.content_length().unwrap_or(0);
        let is_html = content_type.contains("text/html");

        let should_follow =
            ctx.config.follow_links && task.depth < ctx.config.max_depth && is_html;

        let mut links_found = 0usize;
        if should_follow {
            match read_capped_body(response, ctx.config.max_response_body_bytes).await {
                Ok(body) => {
                    let capped = String::from_utf8_lossy(&body);
                    let links = extract_links(&capped);
                    links_found = links.len();
                    for link in links {
                        ctx.crawler
                            .add_url(&link, task.depth + 1, &ctx.base, &ctx.queue)
                            .await;
                    }
                    finalize_validation(
                        &ctx,
                        &task.url,
                        task.depth,
                        status.as_u16(),
                        response_time,
                        content_length,
                        content_type,
                        links_found,
                    )
                    .await;
                }
                Err(e) => {
                    warn!(url = %task.url, error = %e, "failed to read response body for link extraction");
                    finalize_validation(
                        &ctx,
                        &task.url,
                        task.depth,
                        status.as_u16(),
                        response_time,
                        content_length,
                        content_type,
                        0,
                    )
                    .await;
                }
            }
        } else {
            finalize_validation(
                &ctx,
                &task.url,
                task.depth,
                status.as_u16(),
                response_time,
                content_length,
                content_type,
                0,
            )
            .await;
        }
    }
}

/// Reads the response body incrementally, stopping as soon as `cap` bytes
/// have been pulled off the wire rather than buffering the whole body and
/// truncating afterward — a same-host page many megabytes long must not be
/// fully materialized just to scan its first 64 KiB for links.
async fn read_capped_body(mut response: reqwest::Response, cap: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::with_capacity(cap.min(8192));
    while body.len() < cap {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        let remaining = cap - body.len();
        if chunk.len() > remaining {
            body.extend_from_slice(&chunk[..remaining]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn request_path(raw_url: &str) -> String {
    match Url::parse(raw_url) {
        Ok(u) => match u.query() {
            Some(q) => format!("{}?{}", u.path(), q),
            None => u.path().to_string(),
        },
        Err(_) => "/".to_string(),
    }
}

fn apply_auth(
    builder: reqwest::RequestBuilder,
    user_agent: &str,
    auth: Option<&AuthConfig>,
) -> reqwest::RequestBuilder {
    let mut builder = builder
        .header(header::USER_AGENT, user_agent)
        .header(header::ACCEPT, defaults::ACCEPT_HEADER);

    builder = match auth {
        Some(AuthConfig::Basic { username, password }) => {
            builder.basic_auth(username, Some(password))
        }
        Some(AuthConfig::Bearer { token }) => builder.bearer_auth(token),
        Some(AuthConfig::Cookie { cookies }) => {
            let value = cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder.header(header::COOKIE, value)
        }
        Some(AuthConfig::Header { headers }) => {
            for (name, value) in headers {
                builder = builder.header(name, value);
            }
            builder
        }
        None => builder,
    };

    builder
}

/// Builds the final `URLValidation` for this attempt, marks it slow if it
/// crossed the threshold, and emits both. In dry-run mode the request
/// still happens (so link discovery still works) but `status_code`/
/// `is_valid` are zeroed.
async fn finalize_validation(
    ctx: &WorkerContext,
    url: &str,
    depth: u32,
    status_code: u16,
    response_time: Duration,
    content_length: u64,
    content_type: String,
    links_found: usize,
) {
    if response_time > defaults::SLOW_REQUEST_THRESHOLD {
        ctx.metrics
            .send_slow_request(SlowRequest {
                url: url.to_string(),
                duration: response_time,
                status_code,
            })
            .await;
    }

    let (status_code, is_valid) = if ctx.config.dry_run {
        (0, false)
    } else {
        (status_code, (200..400).contains(&status_code))
    };

    ctx.metrics
        .send_validation(URLValidation {
            url: url.to_string(),
            status_code,
            response_time,
            content_length,
            content_type,
            links_found,
            depth,
            is_valid,
            error: None,
        })
        .await;
}

async fn record_failure(ctx: &WorkerContext, url: &str, depth: u32, reason: &str) {
    ctx.counters.failed.fetch_add(1, Ordering::Relaxed);
    debug!(url, reason, "worker recorded failure without a request");
    emit_error(ctx, url, depth, reason).await;
}

async fn emit_error(ctx: &WorkerContext, url: &str, depth: u32, message: &str) {
    let sanitized = Sanitizer::sanitize(message, ctx.config.verbose_errors);
    ctx.metrics
        .send_error(ErrorInfo {
            url: url.to_string(),
            error: sanitized,
            timestamp: Utc::now(),
            depth,
        })
        .await;
}
