//! GitHub API error types.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Token required to modify issues")]
    AuthRequired,

    #[error("search query failed: {0}")]
    SearchFailed(String),

    #[error("GitHub API request failed: {0}")]
    RequestFailed(String),

    #[error("Pagination cycle detected: {0} was already fetched")]
    PaginationCycle(String),

    #[error("Invalid pagination link: {0}")]
    InvalidLink(String),

    #[error("Search returned more than {0} pages")]
    TooManyPages(usize),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Render a status as an HTTP status line, e.g. "404 Not Found".
pub(crate) fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}
