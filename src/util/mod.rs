//! Small stateless helpers that don't belong to any single pipeline stage.

pub mod sanitize;

pub use sanitize::Sanitizer;
