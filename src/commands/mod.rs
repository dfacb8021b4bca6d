pub mod config;
pub mod fetch;
pub mod modify;
pub mod serve;

use std::time::Duration;

use crate::infra::github::{IssueAgent, build_http_client};
use crate::shared::config::Config;

/// Settings shared by every subcommand, resolved once in `main`.
#[derive(Debug)]
pub struct CommandContext {
    pub api_url: String,
    pub config: Config,
}

impl CommandContext {
    /// An unauthenticated agent for `repo` honouring the configured limits.
    pub fn agent(&self, repo: &str) -> anyhow::Result<IssueAgent> {
        let github = &self.config.github;
        let http = build_http_client(Duration::from_secs(github.request_timeout_secs))?;
        Ok(IssueAgent::for_repo(http, &self.api_url, repo).with_max_pages(github.max_pages))
    }
}
