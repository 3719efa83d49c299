//! Domain identification for per-site tables.

use url::Url;

/// Schemes of browser-internal pages the core never runs on.
const BLOCKED_SCHEMES: &[&str] = &[
    "chrome",
    "edge",
    "about",
    "chrome-extension",
    "moz-extension",
    "view-source",
];

/// Hostname keying the shortcut table of `url`, or `None` for pages the core
/// does not attach to.
pub fn domain_for(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if BLOCKED_SCHEMES.contains(&parsed.scheme()) {
        return None;
    }
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_ascii_lowercase())
}

/// Accept either a full URL or a bare hostname (as typed on the command line).
pub fn normalize_domain(input: &str) -> Option<String> {
    let input = input.trim();
    if input.contains("://") {
        return domain_for(input);
    }
    let host = input.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return None;
    }
    Some(host.to_ascii_lowercase())
}
