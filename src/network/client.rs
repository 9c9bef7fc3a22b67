use std::time::Duration;

use crate::config::TesterConfig;
use crate::core::error::EngineError;

/// Builds the shared, connection-pooled HTTP client used by every worker.
/// TLS verification is disabled only when the caller opts in via
/// `insecure_skip_verify`.
pub fn build_client(config: &TesterConfig) -> Result<reqwest::Client, EngineError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(config.insecure_skip_verify)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(EngineError::Http)
}
