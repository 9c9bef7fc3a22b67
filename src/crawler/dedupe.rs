use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use url::Url;

use crate::core::outcome::AddURLOutcome;
use crate::core::task::URLTask;
use crate::queue::{EnqueueResult, URLQueue};

/// Set of canonicalized URL strings the crawler has ever seen, including
/// ones later rejected for depth or queue overflow. Insert is
/// atomic insert-if-absent; `count` is a monotonic counter read by the
/// aggregator at finalization rather than by iterating the set.
pub struct DiscoveredSet {
    seen: Mutex<HashSet<String>>,
    discovered_count: AtomicU64,
    dropped_count: AtomicU64,
}

impl DiscoveredSet {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            discovered_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
        }
    }

    /// Returns `true` if `canonical` was newly inserted.
    fn insert_if_absent(&self, canonical: &str) -> bool {
        let mut guard = self.seen.lock().expect("discovered set mutex poisoned");
        if guard.contains(canonical) {
            false
        } else {
            guard.insert(canonical.to_string());
            self.discovered_count.fetch_add(1, Ordering::Relaxed);
            true
        }
    }

    pub fn count(&self) -> u64 {
        self.discovered_count.load(Ordering::Relaxed)
    }

    /// Discovered URLs rejected because the queue was full at the instant
    /// of admission.
    pub fn dropped(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    fn mark_dropped(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for DiscoveredSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes and admits candidate URLs into the queue.
pub struct Crawler {
    base_host: String,
    max_depth: u32,
    discovered: DiscoveredSet,
}

impl Crawler {
    pub fn new(base: &Url, max_depth: u32) -> Self {
        Self {
            base_host: host_with_port(base),
            max_depth,
            discovered: DiscoveredSet::new(),
        }
    }

    pub fn discovered(&self) -> &DiscoveredSet {
        &self.discovered
    }

    /// Parses the candidate, resolves it against `base` if relative, checks
    /// the host, strips the fragment, deduplicates, checks depth, then
    /// attempts a non-blocking enqueue — in that order.
    pub async fn add_url(&self, raw: &str, depth: u32, base: &Url, queue: &URLQueue) -> AddURLOutcome {
        let mut parsed = match Url::parse(raw) {
            Ok(u) => u,
            Err(_) => match base.join(raw) {
                Ok(u) => u,
                Err(_) => return AddURLOutcome::ParseError,
            },
        };

        if host_with_port(&parsed) != self.base_host {
            return AddURLOutcome::InvalidHost;
        }

        parsed.set_fragment(None);
        let canonical = parsed.to_string();

        if !self.discovered.insert_if_absent(&canonical) {
            return AddURLOutcome::Duplicate;
        }

        if depth > self.max_depth {
            return AddURLOutcome::DepthExceeded;
        }

        match queue.try_enqueue(URLTask::new(canonical, depth)).await {
            EnqueueResult::Enqueued => AddURLOutcome::Success,
            EnqueueResult::Full | EnqueueResult::Closed => {
                self.discovered.mark_dropped();
                AddURLOutcome::QueueFull
            }
        }
    }
}

fn host_with_port(u: &Url) -> String {
    match (u.host_str(), u.port()) {
        (Some(h), Some(p)) => format!("{h}:{p}"),
        (Some(h), None) => h.to_string(),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://a.test/").unwrap()
    }

    #[tokio::test]
    async fn accepts_relative_same_host_url() {
        let crawler = Crawler::new(&base(), 3);
        let queue = URLQueue::new(10);
        let outcome = crawler.add_url("/y", 1, &base(), &queue).await;
        assert_eq!(outcome, AddURLOutcome::Success);
        assert_eq!(crawler.discovered().count(), 1);
    }

    #[tokio::test]
    async fn rejects_cross_host_url() {
        let crawler = Crawler::new(&base(), 3);
        let queue = URLQueue::new(10);
        let outcome = crawler
            .add_url("http://b.test/x", 1, &base(), &queue)
            .await;
        assert_eq!(outcome, AddURLOutcome::InvalidHost);
        assert_eq!(crawler.discovered().count(), 0);
    }

    #[tokio::test]
    async fn second_insert_of_same_canonical_url_is_duplicate() {
        let crawler = Crawler::new(&base(), 3);
        let queue = URLQueue::new(10);
        assert_eq!(
            crawler.add_url("/y", 1, &base(), &queue).await,
            AddURLOutcome::Success
        );
        assert_eq!(
            crawler.add_url("/y", 1, &base(), &queue).await,
            AddURLOutcome::Duplicate
        );
        assert_eq!(crawler.discovered().count(), 1);
    }

    #[tokio::test]
    async fn depth_exceeded_still_counts_as_discovered() {
        let crawler = Crawler::new(&base(), 0);
        let queue = URLQueue::new(10);
        let outcome = crawler.add_url("/deep", 1, &base(), &queue).await;
        assert_eq!(outcome, AddURLOutcome::DepthExceeded);
        assert_eq!(crawler.discovered().count(), 1);
    }

    #[tokio::test]
    async fn queue_full_still_counts_as_discovered_and_drops() {
        let crawler = Crawler::new(&base(), 3);
        let queue = URLQueue::new(1);
        queue
            .try_enqueue(URLTask::new("http://a.test/filler".to_string(), 0))
            .await;
        let outcome = crawler.add_url("/y", 0, &base(), &queue).await;
        assert_eq!(outcome, AddURLOutcome::QueueFull);
        assert_eq!(crawler.discovered().count(), 1);
        assert_eq!(crawler.discovered().dropped(), 1);
    }

    #[tokio::test]
    async fn fragment_is_stripped_before_dedup() {
        let crawler = Crawler::new(&base(), 3);
        let queue = URLQueue::new(10);
        assert_eq!(
            crawler.add_url("/y#section", 0, &base(), &queue).await,
            AddURLOutcome::Success
        );
        assert_eq!(
            crawler.add_url("/y", 0, &base(), &queue).await,
            AddURLOutcome::Duplicate
        );
    }

    #[tokio::test]
    async fn unparseable_url_is_parse_error() {
        let crawler = Crawler::new(&base(), 3);
        let queue = URLQueue::new(10);
        let outcome = crawler.add_url("http://[::1", 0, &base(), &queue).await;
        assert_eq!(outcome, AddURLOutcome::ParseError);
    }
}
