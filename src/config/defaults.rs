//! Named constants backing the configuration defaults table.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(120);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = "Lobster/1.0";
pub const DEFAULT_RATE: f64 = 2.0;
pub const DEFAULT_FOLLOW_LINKS: bool = true;
pub const DEFAULT_MAX_DEPTH: u32 = 3;
pub const DEFAULT_QUEUE_SIZE: usize = 10_000;
pub const DEFAULT_RESPECT_429: bool = true;
pub const DEFAULT_DRY_RUN: bool = false;
pub const DEFAULT_MAX_RESPONSE_BODY_BYTES: usize = 64 * 1024;

pub const ROBOTS_TIMEOUT: Duration = Duration::from_secs(10);
pub const ROBOTS_MAX_BODY_BYTES: usize = 1024 * 1024;

pub const RETRY_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const RETRY_BACKOFF_EXPONENT: u32 = 2;
pub const RETRY_BACKOFF_CAP: Duration = Duration::from_secs(30);
pub const RETRY_MAX_ATTEMPTS: u32 = 5;

pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(2);
pub const PROGRESS_TICK_INTERVAL: Duration = Duration::from_secs(10);

pub const ACCEPT_HEADER: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
