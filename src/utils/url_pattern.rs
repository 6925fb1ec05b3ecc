//! URL shape matching and host extraction.
//!
//! Submitted URLs are checked against a permissive, scheme-agnostic pattern
//! rather than parsed strictly: anything shaped like
//! `scheme://host:port/path?query#fragment` (with most parts optional) is
//! accepted.

use regex::Regex;
use std::sync::LazyLock;

/// Generic URL shape: optional scheme, up to three slashes, host, optional
/// port, path, query and fragment.
static URL_SHAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:([A-Za-z]+):)?(/{0,3})([0-9.\-A-Za-z]+)(?::(\d+))?(?:/([^?#]*))?(?:\?([^#]*))?(?:#(.*))?$",
    )
    .expect("URL shape pattern is valid")
});

/// Everything between `://` and the next `/`.
static AUTHORITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"://([^/]+)").expect("authority pattern is valid"));

/// Capture group of the host in [`URL_SHAPE_REGEX`].
const HOST_GROUP: usize = 3;

/// Returns true if `input` looks like a URL.
///
/// # Examples
///
/// ```
/// use shortlink::utils::url_pattern::is_url_shaped;
///
/// assert!(is_url_shaped("https://example.com/path?q=1#top"));
/// assert!(is_url_shaped("example.com"));
/// assert!(!is_url_shaped("not a url"));
/// ```
pub fn is_url_shaped(input: &str) -> bool {
    URL_SHAPE_REGEX.is_match(input)
}

/// Extracts the domain stored alongside a link.
///
/// Takes the text between `://` and the next `/` (port included). URLs
/// without a scheme separator fall back to the host matched by the URL shape
/// pattern. Returns `None` if neither applies.
pub fn extract_domain(url: &str) -> Option<String> {
    if let Some(captures) = AUTHORITY_REGEX.captures(url) {
        return captures.get(1).map(|m| m.as_str().to_string());
    }

    URL_SHAPE_REGEX
        .captures(url)
        .and_then(|c| c.get(HOST_GROUP))
        .map(|m| m.as_str().to_string())
}
