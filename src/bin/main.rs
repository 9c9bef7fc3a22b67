//! Minimal demo binary. Full CLI flag parsing, config file loading, and
//! environment-variable substitution are external collaborators — this
//! binary only does enough to hand the engine a runnable `TesterConfig`
//! and print its `TestResults` as JSON.

use lobster::{Engine, TesterConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = TesterConfig::default();
    if let Some(base_url) = std::env::args().nth(1) {
        config.base_url = base_url;
    }

    info!(base_url = %config.base_url, concurrency = config.concurrency, "starting lobster run");

    let engine = Engine::new(config)?;
    let results = engine.run().await?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
