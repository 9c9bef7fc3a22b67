use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::auth::AuthConfig;
use super::defaults;
use crate::core::error::EngineError;

/// Validated configuration handed to the engine at construction time.
///
/// `TesterConfig` is built once by the caller (CLI flag parsing, config file
/// loading, and environment substitution are all external collaborators)
/// and is immutable for the lifetime of the `Engine`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TesterConfig {
    pub base_url: String,
    pub concurrency: usize,
    pub duration: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    /// Requests per second across the whole pool. `0.0` means unlimited.
    pub rate: f64,
    pub max_depth: u32,
    pub queue_size: usize,
    pub follow_links: bool,
    pub respect_429: bool,
    pub dry_run: bool,
    pub insecure_skip_verify: bool,
    pub ignore_robots: bool,
    pub auth: Option<AuthConfig>,
    pub max_response_body_bytes: usize,
    /// When false (the default), error messages recorded in `TestResults`
    /// are passed through the sanitizer before being stored.
    #[serde(default)]
    pub verbose_errors: bool,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_BASE_URL.to_string(),
            concurrency: defaults::DEFAULT_CONCURRENCY,
            duration: defaults::DEFAULT_DURATION,
            timeout: defaults::DEFAULT_TIMEOUT,
            user_agent: defaults::DEFAULT_USER_AGENT.to_string(),
            rate: defaults::DEFAULT_RATE,
            max_depth: defaults::DEFAULT_MAX_DEPTH,
            queue_size: defaults::DEFAULT_QUEUE_SIZE,
            follow_links: defaults::DEFAULT_FOLLOW_LINKS,
            respect_429: defaults::DEFAULT_RESPECT_429,
            dry_run: defaults::DEFAULT_DRY_RUN,
            insecure_skip_verify: false,
            ignore_robots: false,
            auth: None,
            max_response_body_bytes: defaults::DEFAULT_MAX_RESPONSE_BODY_BYTES,
            verbose_errors: false,
        }
    }
}

impl TesterConfig {
    pub fn builder() -> TesterConfigBuilder {
        TesterConfigBuilder::new()
    }

    /// Validates the configuration. Called from `Engine::new`; fatal
    /// configuration errors never reach the worker pool.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.base_url.trim().is_empty() {
            return Err(EngineError::Configuration(
                "base_url must not be empty".to_string(),
            ));
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(EngineError::Configuration(format!(
                "base_url is not a valid URL: {}",
                self.base_url
            )));
        }
        if self.concurrency < 1 {
            return Err(EngineError::Configuration(
                "concurrency must be >= 1".to_string(),
            ));
        }
        if self.queue_size < 1 {
            return Err(EngineError::Configuration(
                "queue_size must be >= 1".to_string(),
            ));
        }
        if self.rate < 0.0 {
            return Err(EngineError::Configuration(
                "rate must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for `TesterConfig`, grouping related settings the way a caller
/// typically supplies them (target/identity, concurrency/timing, crawl
/// policy, auth). `build()` returns the config unvalidated; `Engine::new`
/// still runs `validate()`.
#[derive(Debug)]
pub struct TesterConfigBuilder {
    config: TesterConfig,
}

impl TesterConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TesterConfig::default(),
        }
    }

    pub fn with_target(mut self, base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn with_concurrency_and_timing(
        mut self,
        concurrency: usize,
        duration: Duration,
        timeout: Duration,
    ) -> Self {
        self.config.concurrency = concurrency;
        self.config.duration = duration;
        self.config.timeout = timeout;
        self
    }

    pub fn with_rate(mut self, requests_per_second: f64) -> Self {
        self.config.rate = requests_per_second;
        self
    }

    pub fn with_crawl_policy(mut self, follow_links: bool, max_depth: u32, queue_size: usize) -> Self {
        self.config.follow_links = follow_links;
        self.config.max_depth = max_depth;
        self.config.queue_size = queue_size;
        self
    }

    pub fn with_retry_and_dry_run(mut self, respect_429: bool, dry_run: bool) -> Self {
        self.config.respect_429 = respect_429;
        self.config.dry_run = dry_run;
        self
    }

    pub fn with_tls(mut self, insecure_skip_verify: bool) -> Self {
        self.config.insecure_skip_verify = insecure_skip_verify;
        self
    }

    pub fn with_robots(mut self, ignore_robots: bool) -> Self {
        self.config.ignore_robots = ignore_robots;
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = Some(auth);
        self
    }

    pub fn with_max_response_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_response_body_bytes = bytes;
        self
    }

    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.config.verbose_errors = verbose;
        self
    }

    pub fn build(self) -> TesterConfig {
        self.config
    }
}

impl Default for TesterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
