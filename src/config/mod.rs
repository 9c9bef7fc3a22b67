//! Configuration types handed to the engine by an external collaborator
//! (CLI flag parsing, config file loading, and env substitution all live
//! outside this crate).

pub mod auth;
pub mod defaults;
pub mod tester_config;

pub use auth::AuthConfig;
pub use tester_config::{TesterConfig, TesterConfigBuilder};
