//! URL normalization, deduplication, and HTML link extraction — the first
//! stage of the pipeline.

pub mod dedupe;
pub mod extract;

pub use dedupe::{Crawler, DiscoveredSet};
pub use extract::extract_links;
