use thiserror::Error;

/// Errors that abort construction or startup. Per-request failures are never
/// modeled as this type — they are recorded as [`crate::core::results::ErrorInfo`]
/// data instead (see the engine's error taxonomy).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("startup failed: {0}")]
    Startup(String),

    #[error("robots.txt fetch returned {status}, aborting")]
    RobotsBlocking { status: u16 },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}
