use std::sync::LazyLock;

use regex::Regex;

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href\s*=\s*["']([^"']*)["']"#).expect("static href regex is valid")
});

/// Scans `body` for `href="…"`/`href='…'` attributes, HTML-entity-decodes
/// each match, and drops empty links, fragment-only links, `javascript:`,
/// and `mailto:` links. Not a DOM parser: `href` occurring inside comments
/// or script string literals is matched too, by design.
pub fn extract_links(body: &str) -> Vec<String> {
    HREF_RE
        .captures_iter(body)
        .map(|cap| decode_entities(&cap[1]))
        .filter(|link| !link.is_empty())
        .filter(|link| !link.starts_with('#'))
        .filter(|link| !link.to_ascii_lowercase().starts_with("javascript:"))
        .filter(|link| !link.to_ascii_lowercase().starts_with("mailto:"))
        .collect()
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}
