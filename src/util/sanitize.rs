//! Redacts IP addresses, internal hostnames, long file paths, and sensitive
//! query parameters from error messages before they are stored in
//! `TestResults.errors[*].error`, unless the caller opts into verbose
//! errors. A small stateless utility struct with associated functions.

use std::sync::LazyLock;

use regex::Regex;

static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("static ipv4 regex is valid")
});

static LOCAL_HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9-]+\.(internal|local|corp|lan)\b").expect("static hostname regex is valid")
});

static LONG_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/[^\s/]+){4,}").expect("static path regex is valid")
});

static QUERY_STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?[^\s]+").expect("static query regex is valid"));

pub struct Sanitizer;

impl Sanitizer {
    /// Redacts an error message before it is stored in `ErrorInfo`, unless
    /// the caller opted into `verbose_errors`.
    pub fn sanitize(message: &str, verbose: bool) -> String {
        if verbose {
            return message.to_string();
        }
        let redacted = IPV4_RE.replace_all(message, "[redacted-ip]");
        let redacted = LOCAL_HOSTNAME_RE.replace_all(&redacted, "[redacted-host]");
        let redacted = QUERY_STRING_RE.replace_all(&redacted, "[redacted-query]");
        let redacted = LONG_PATH_RE.replace_all(&redacted, "[redacted-path]");
        redacted.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_ipv4_address() {
        let out = Sanitizer::sanitize("connect to 10.0.0.5 failed", false);
        assert_eq!(out, "connect to [redacted-ip] failed");
    }

    #[test]
    fn redacts_internal_hostname() {
        let out = Sanitizer::sanitize("dns lookup for db.internal failed", false);
        assert_eq!(out, "dns lookup for [redacted-host] failed");
    }

    #[test]
    fn redacts_query_string() {
        let out = Sanitizer::sanitize("GET /reset?token=abc123 failed", false);
        assert_eq!(out, "GET /reset[redacted-query] failed");
    }

    #[test]
    fn redacts_long_file_path() {
        let out = Sanitizer::sanitize("open /var/log/app/2026/trace.log failed", false);
        assert_eq!(out, "open [redacted-path] failed");
    }

    #[test]
    fn verbose_mode_passes_through_untouched() {
        let out = Sanitizer::sanitize("connect to 10.0.0.5 failed", true);
        assert_eq!(out, "connect to 10.0.0.5 failed");
    }
}
