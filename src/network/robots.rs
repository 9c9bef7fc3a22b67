use url::Url;

use crate::core::error::EngineError;

/// Rules scoped to the configured user-agent (falling back to `*`), built
/// once at startup and read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct RobotsRuleSet {
    disallow: Vec<String>,
    allow: Vec<String>,
    crawl_delay: Option<f64>,
    found: bool,
}

impl RobotsRuleSet {
    /// No `robots.txt` present (or ignore-robots is set): everything allowed.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn found(&self) -> bool {
        self.found
    }

    /// Parsed but never enforced by the worker loop; exposed for an
    /// external collaborator that wants it.
    pub fn crawl_delay(&self) -> Option<f64> {
        self.crawl_delay
    }

    /// Allow rules are checked first and override; then Disallow; absence
    /// of any matching rule allows. No length-based specificity.
    pub fn is_allowed(&self, path: &str) -> bool {
        if self.allow.iter().any(|p| matches_pattern(p, path)) {
            return true;
        }
        if self.disallow.iter().any(|p| matches_pattern(p, path)) {
            return false;
        }
        true
    }
}

/// Line-oriented robots.txt parser scoped to a single user-agent. Pure
/// and idempotent once given a body.
pub fn parse(body: &str, user_agent: &str) -> RobotsRuleSet {
    let ua_lower = user_agent.to_ascii_lowercase();

    let mut disallow = Vec::new();
    let mut allow = Vec::new();
    let mut crawl_delay = None;

    let mut current_agents: Vec<String> = Vec::new();
    let mut group_matches = false;
    let mut group_open = false;

    for raw_line in body.lines() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if !group_open {
                    current_agents.clear();
                    group_matches = false;
                }
                group_open = true;
                let agent_lower = value.to_ascii_lowercase();
                if agent_lower == "*" || ua_lower.contains(&agent_lower) {
                    group_matches = true;
                }
                current_agents.push(value.to_string());
            }
            "disallow" => {
                group_open = false;
                if group_matches && !value.is_empty() {
                    disallow.push(value.to_string());
                }
            }
            "allow" => {
                group_open = false;
                if group_matches && !value.is_empty() {
                    allow.push(value.to_string());
                }
            }
            "crawl-delay" => {
                group_open = false;
                if group_matches {
                    if let Ok(secs) = value.parse::<f64>() {
                        crawl_delay = Some(secs);
                    }
                }
            }
            _ => {
                group_open = false;
            }
        }
    }

    RobotsRuleSet {
        disallow,
        allow,
        crawl_delay,
        found: true,
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Empty patterns never match; `$`-anchored patterns match the end;
/// `*`-wildcard segments match in order; otherwise a plain prefix match.
fn matches_pattern(pattern: &str, path: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    let anchored = pattern.ends_with('$');
    let body = if anchored {
        &pattern[..pattern.len() - 1]
    } else {
        pattern
    };

    if body.contains('*') {
        let segments: Vec<&str> = body.split('*').collect();
        let first = segments[0];
        if !path.starts_with(first) {
            return false;
        }
        let mut pos = first.len();
        for seg in &segments[1..] {
            if seg.is_empty() {
                continue;
            }
            match path[pos..].find(seg) {
                Some(idx) => pos += idx + seg.len(),
                None => return false,
            }
        }
        if anchored { pos == path.len() } else { true }
    } else if anchored {
        path == body
    } else {
        path.starts_with(body)
    }
}

/// Fetches and parses `robots.txt` at startup.
pub async fn fetch_and_parse(
    client: &reqwest::Client,
    base: &Url,
    user_agent: &str,
) -> Result<RobotsRuleSet, EngineError> {
    let mut robots_url = base.clone();
    robots_url.set_path("/robots.txt");
    robots_url.set_query(None);
    robots_url.set_fragment(None);

    let response = match client
        .get(robots_url)
        .timeout(crate::config::defaults::ROBOTS_TIMEOUT)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(_) => return Ok(RobotsRuleSet::allow_all()),
    };

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(RobotsRuleSet::allow_all());
    }
    if status.is_client_error() || status.is_server_error() {
        return Err(EngineError::RobotsBlocking {
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Ok(RobotsRuleSet::allow_all());
    }

    let bytes = response
        .bytes()
        .await
        .unwrap_or_default();
    let capped = &bytes[..bytes.len().min(crate::config::defaults::ROBOTS_MAX_BODY_BYTES)];
    let body = String::from_utf8_lossy(capped);
    Ok(parse(&body, user_agent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallow_blocks_matching_prefix() {
        let rules = parse("User-agent: *\nDisallow: /admin", "Lobster/1.0");
        assert!(!rules.is_allowed("/admin/users"));
        assert!(rules.is_allowed("/public"));
    }

    #[test]
    fn allow_overrides_disallow() {
        let rules = parse(
            "User-agent: *\nDisallow: /admin\nAllow: /admin/public",
            "Lobster/1.0",
        );
        assert!(rules.is_allowed("/admin/public"));
        assert!(!rules.is_allowed("/admin/secret"));
    }

    #[test]
    fn group_only_applies_to_matching_agent() {
        let rules = parse(
            "User-agent: Googlebot\nDisallow: /only-google\nUser-agent: *\nDisallow: /all",
            "Lobster/1.0",
        );
        assert!(rules.is_allowed("/only-google"));
        assert!(!rules.is_allowed("/all"));
    }

    #[test]
    fn no_matching_rule_allows() {
        let rules = parse("User-agent: *\nDisallow: /admin", "Lobster/1.0");
        assert!(rules.is_allowed("/elsewhere"));
    }

    #[test]
    fn wildcard_segments_must_appear_in_order() {
        assert!(matches_pattern("/a*c", "/abc"));
        assert!(!matches_pattern("/a*c", "/cba"));
    }

    #[test]
    fn dollar_anchors_the_end() {
        assert!(matches_pattern("/file.php$", "/file.php"));
        assert!(!matches_pattern("/file.php$", "/file.php?x=1"));
    }

    #[test]
    fn crawl_delay_is_parsed_but_only_exposed() {
        let rules = parse("User-agent: *\nCrawl-delay: 5", "Lobster/1.0");
        assert_eq!(rules.crawl_delay(), Some(5.0));
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let rules = parse("# comment\n\nUser-agent: *\nDisallow: /x # trailing", "Lobster/1.0");
        assert!(!rules.is_allowed("/x"));
    }
}
