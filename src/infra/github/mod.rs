//! GitHub issue tracker client.
//!
//! Talks to the REST issues endpoints directly with reqwest, following
//! `Link` pagination for searches.

mod client;
mod error;
mod issue;
mod link;
#[cfg(test)]
pub(crate) mod mock;

pub use client::{
    DEFAULT_API_URL, DEFAULT_MAX_PAGES, IssueAgent, SearchParams, build_http_client,
};
pub use issue::Issue;
