//! GitHub issue REST client built on reqwest.
//!
//! The free functions map one-to-one onto the REST calls. `IssueAgent`
//! binds them to a single repository, a token and a set of default search
//! parameters.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode, Url};

use super::error::{GitHubError, Result, status_line};
use super::issue::{Issue, IssueFields, IssueState};
use super::link::next_link;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_PAGES: usize = 100;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("issuebot/", env!("CARGO_PKG_VERSION"));

/// Query parameters for an issue search. Ordered so request URLs are stable.
pub type SearchParams = BTreeMap<String, String>;

/// Build the shared HTTP client used for every GitHub call.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(CLIENT_USER_AGENT)
        .build()?)
}

/// Issues endpoint of a repository, e.g. `https://api.github.com/repos/owner/repo/issues`.
pub fn repo_issues_url(api_url: &str, repo: &str) -> String {
    format!("{}/repos/{repo}/issues", api_url.trim_end_matches('/'))
}

fn github_headers(request: RequestBuilder) -> RequestBuilder {
    request
        .header(ACCEPT, GITHUB_MEDIA_TYPE)
        .header(USER_AGENT, CLIENT_USER_AGENT)
}

/// Run an issue query and return every issue across all result pages.
///
/// GitHub caps the page size, so the `rel="next"` link of each response is
/// followed until a response comes back without one. A link that was
/// already fetched or more than `max_pages` pages abort the search.
pub async fn search_issues(
    http: &Client,
    base: &str,
    params: &SearchParams,
    max_pages: usize,
) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let mut visited = HashSet::new();
    let mut request = github_headers(http.get(base).query(params)).build()?;
    let mut pages = 0;

    loop {
        pages += 1;
        if pages > max_pages {
            return Err(GitHubError::TooManyPages(max_pages));
        }
        visited.insert(request.url().to_string());
        tracing::debug!(url = %request.url(), page = pages, "fetching issue page");

        let response = http.execute(request).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(GitHubError::SearchFailed(status_line(status)));
        }
        let next = next_link(response.headers());
        let body = response.text().await?;
        let page: Vec<Issue> = serde_json::from_str(&body)?;
        issues.extend(page);

        let Some(next) = next else {
            break;
        };
        // Compare normalized forms so spelling variants of a page still match.
        let next = Url::parse(&next).map_err(|_| GitHubError::InvalidLink(next.clone()))?;
        if visited.contains(next.as_str()) {
            return Err(GitHubError::PaginationCycle(next.into()));
        }
        request = github_headers(http.get(next)).build()?;
    }

    tracing::debug!(count = issues.len(), pages, "issue search complete");
    Ok(issues)
}

/// Fetch a single issue. `base` is a repository issues endpoint.
pub async fn get_issue(http: &Client, base: &str, number: u64) -> Result<Issue> {
    let url = format!("{base}/{number}");
    tracing::debug!(%url, "fetching issue");

    let response = github_headers(http.get(&url)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(GitHubError::RequestFailed(status_line(status)));
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Change fields of an issue. Single attempt, no retry.
///
/// `token` is sent verbatim as the `Authorization` header and must not be empty.
pub async fn patch_issue(
    http: &Client,
    base: &str,
    token: &str,
    number: u64,
    fields: &IssueFields,
) -> Result<()> {
    if token.is_empty() {
        return Err(GitHubError::AuthRequired);
    }

    let url = format!("{base}/{number}");
    let body = serde_json::to_vec(fields)?;
    tracing::debug!(%url, fields = ?fields, "patching issue");

    let response = github_headers(http.patch(&url))
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, token)
        .body(body)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(GitHubError::RequestFailed(status_line(status)));
    }
    Ok(())
}

/// Issue operations bound to one repository.
#[derive(Clone, Debug)]
pub struct IssueAgent {
    http: Client,
    base: String,
    token: String,
    fixed_params: SearchParams,
    max_pages: usize,
}

impl IssueAgent {
    pub fn new(http: Client, base: impl Into<String>, params: SearchParams) -> Self {
        Self {
            http,
            base: base.into(),
            token: String::new(),
            fixed_params: params,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Agent for the issues of `repo` ("owner/name") under `api_url`.
    pub fn for_repo(http: Client, api_url: &str, repo: &str) -> Self {
        Self::new(http, repo_issues_url(api_url, repo), SearchParams::new())
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Add a parameter sent with every search.
    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fixed_params.insert(key.into(), value.into());
    }

    /// Search issues. `params` override the agent's defaults on collision.
    pub async fn fetch_issues(&self, params: &SearchParams) -> Result<Vec<Issue>> {
        let mut merged = self.fixed_params.clone();
        merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        search_issues(&self.http, &self.base, &merged, self.max_pages).await
    }

    pub async fn get_issue(&self, number: u64) -> Result<Issue> {
        get_issue(&self.http, &self.base, number).await
    }

    async fn modify_issue(&self, number: u64, fields: IssueFields) -> Result<()> {
        patch_issue(&self.http, &self.base, &self.token, number, &fields).await
    }

    pub async fn close_issue(&self, number: u64) -> Result<()> {
        self.modify_issue(number, IssueFields::state(IssueState::Closed)).await
    }

    pub async fn open_issue(&self, number: u64) -> Result<()> {
        self.modify_issue(number, IssueFields::state(IssueState::Open)).await
    }

    pub async fn assign_issue(&self, number: u64, user: &str) -> Result<()> {
        self.modify_issue(number, IssueFields::assignees(vec![user.to_string()])).await
    }

    pub async fn unassign_issue(&self, number: u64) -> Result<()> {
        self.modify_issue(number, IssueFields::assignees(Vec::new())).await
    }
}
