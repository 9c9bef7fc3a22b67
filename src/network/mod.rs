//! HTTP client construction, the token-bucket rate limiter, 429 retry/backoff,
//! and robots.txt compliance — everything workers need to issue a request.

pub mod client;
pub mod rate_limit;
pub mod retry;
pub mod robots;

pub use client::build_client;
pub use rate_limit::RateLimiter;
pub use robots::RobotsRuleSet;
