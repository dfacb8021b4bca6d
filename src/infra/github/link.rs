//! `Link` header parsing for paginated responses.
//!
//! GitHub sends the pagination links on one line, any of which may be absent:
//!
//! ```text
//! <https://api.github.com/repositories/1/issues?page=1>; rel="prev",
//!   <https://api.github.com/repositories/1/issues?page=3>; rel="next",
//!   <https://api.github.com/repositories/1/issues?page=7>; rel="last"
//! ```

use lazy_regex::regex_captures;
use reqwest::header::{HeaderMap, LINK};

/// Returns the `rel="next"` URL from the response headers, if any.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

/// Extracts the `rel="next"` URL from a single `Link` header value.
pub fn parse_next_link(value: &str) -> Option<String> {
    let (_, url) = regex_captures!(r#"<([^>]+)>;\s*rel="next""#, value)?;
    Some(url.to_string())
}
