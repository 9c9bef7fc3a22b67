/// A canonical, absolute URL paired with its crawl depth. Created once on
/// enqueue and consumed exactly once by whichever worker receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct URLTask {
    pub url: String,
    pub depth: u32,
}

impl URLTask {
    pub fn new(url: String, depth: u32) -> Self {
        Self { url, depth }
    }
}
