//! Core data types shared across the pipeline: errors, the enqueue outcome
//! tag, the task unit, and the result model.

pub mod error;
pub mod outcome;
pub mod results;
pub mod task;

pub use error::EngineError;
pub use outcome::AddURLOutcome;
pub use results::{ErrorInfo, ResponseTimeEntry, SlowRequest, TestResults, URLValidation};
pub use task::URLTask;
