//! Syntactic URL validation.

use regex::Regex;
use std::sync::LazyLock;

// Octets of the IPv4 form are not range checked.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:http)s?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+",
        r"(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|",
        r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("url pattern is a valid regex")
});

/// Returns `true` if `input` is an absolute `http`/`https` URL whose host is
/// a dotted hostname or a dotted-quad address, optionally followed by a port
/// and a path or query.
///
/// No DNS lookups or other I/O happen here.
pub fn is_valid_url(input: &str) -> bool {
    URL_PATTERN.is_match(input)
}
