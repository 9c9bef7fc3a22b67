//! The bounded, non-blocking URL task queue shared by the crawler and the
//! worker pool.

pub mod url_queue;

pub use url_queue::{EnqueueResult, URLQueue};
