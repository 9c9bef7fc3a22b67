//! Lobster: a concurrent HTTP load-testing and site-crawling engine.
//!
//! Given a seed URL, the engine discovers same-host links by parsing HTML
//! responses, drives a fixed pool of workers issuing HTTP GET requests
//! against discovered URLs under a configurable rate limit, and aggregates
//! latency, throughput, and validity statistics into [`TestResults`].
//!
//! CLI flag parsing, config file loading, report rendering, and
//! performance-target evaluation are all external collaborators — this
//! crate consumes a validated [`TesterConfig`] and produces [`TestResults`].

pub mod aggregator;
pub mod config;
pub mod core;
pub mod crawler;
pub mod engine;
pub mod network;
pub mod queue;
pub mod stats;
pub mod util;
pub mod worker;

pub use config::{defaults, AuthConfig, TesterConfig, TesterConfigBuilder};
pub use core::{AddURLOutcome, EngineError, ErrorInfo, ResponseTimeEntry, SlowRequest, TestResults, URLValidation};
pub use engine::{Engine, EngineState};
