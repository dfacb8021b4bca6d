//! wiremock-based GitHub mock server for testing.
//!
//! Provides `GitHubMockServer` for HTTP-level mocking of the issue endpoints.
//!
//! # Usage
//!
//! ```ignore
//! let mock = GitHubMockServer::start().await;
//! let ctx = mock.repo("owner", "repo");
//!
//! // Single issue operations
//! ctx.issue(123).get().await;
//! ctx.issue(123).title("Custom").assignee("octocat").get().await;
//! ctx.issue(123).get_not_found().await;
//! ctx.issue(123).update().await;
//! ctx.issue(123).update_with(json!({"state": "closed"})).await;
//!
//! // Paginated listing
//! ctx.issue_page(&[1, 2]).next_page(2).mount().await;
//! ctx.issue_page(&[3]).page(2).mount().await;
//!
//! let agent = mock.agent("owner/repo");
//! ```

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use super::client::{IssueAgent, build_http_client};

/// Path that follow-up pages are served from, like GitHub's `/repositories/{id}/issues`.
const PAGES_PATH: &str = "/repositories/1/issues";

/// Create a mock user JSON object.
fn mock_user(login: &str) -> serde_json::Value {
    json!({
        "login": login,
        "id": 1,
        "node_id": "U_test",
        "html_url": format!("https://github.com/{login}"),
        "type": "User",
        "site_admin": false
    })
}

/// Create a mock issue JSON object.
fn mock_issue(
    owner: &str,
    repo: &str,
    number: u64,
    title: &str,
    state: &str,
    assignee: Option<&str>,
) -> serde_json::Value {
    json!({
        "id": number,
        "node_id": "I_test",
        "url": format!("https://api.github.com/repos/{owner}/{repo}/issues/{number}"),
        "html_url": format!("https://github.com/{owner}/{repo}/issues/{number}"),
        "number": number,
        "state": state,
        "title": title,
        "body": "Test body",
        "user": mock_user("testuser"),
        "labels": [{
            "name": "bug",
            "url": format!("https://api.github.com/repos/{owner}/{repo}/labels/bug")
        }],
        "assignee": assignee.map(mock_user),
        "assignees": assignee.map(mock_user).into_iter().collect::<Vec<_>>(),
        "locked": false,
        "comments": 0,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "closed_at": null
    })
}

/// wiremock-based GitHub mock server for testing.
pub struct GitHubMockServer {
    server: MockServer,
}

impl GitHubMockServer {
    /// Token the agents returned by `agent()` authenticate with.
    pub const TOKEN: &'static str = "token test-token";

    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// An `IssueAgent` for `repo` pointed at this server.
    pub fn agent(&self, repo: &str) -> IssueAgent {
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        IssueAgent::for_repo(http, &self.server.uri(), repo).with_token(Self::TOKEN)
    }

    pub fn repo<'a>(&'a self, owner: &'a str, repo: &'a str) -> MockRepoContext<'a> {
        MockRepoContext {
            server: &self.server,
            owner,
            repo,
        }
    }

    /// All requests the server has seen so far, in arrival order.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

// ============ Builder Pattern API ============

/// Repository context for building mocks.
pub struct MockRepoContext<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> MockRepoContext<'a> {
    fn issues_path(&self) -> String {
        format!("/repos/{}/{}/issues", self.owner, self.repo)
    }

    pub fn issue(&self, number: u64) -> MockIssueBuilder<'_> {
        MockIssueBuilder {
            ctx: self,
            number,
            title: "Test Issue",
            state: "open",
            assignee: None,
        }
    }

    /// A page of issue listings. Without `page()` it answers the first request
    /// to the repository issues endpoint.
    pub fn issue_page(&self, numbers: &[u64]) -> MockPageBuilder<'_> {
        MockPageBuilder {
            ctx: self,
            numbers: numbers.to_vec(),
            page: None,
            next_page: None,
            next_link_path: None,
            status: 200,
            query: Vec::new(),
        }
    }
}

pub struct MockIssueBuilder<'a> {
    ctx: &'a MockRepoContext<'a>,
    number: u64,
    title: &'a str,
    state: &'a str,
    assignee: Option<&'a str>,
}

impl<'a> MockIssueBuilder<'a> {
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn state(mut self, state: &'a str) -> Self {
        self.state = state;
        self
    }

    pub fn assignee(mut self, login: &'a str) -> Self {
        self.assignee = Some(login);
        self
    }

    fn path(&self) -> String {
        format!("{}/{}", self.ctx.issues_path(), self.number)
    }

    /// Mock GET for this issue.
    pub async fn get(self) {
        let body = mock_issue(
            self.ctx.owner,
            self.ctx.repo,
            self.number,
            self.title,
            self.state,
            self.assignee,
        );
        Mock::given(method("GET"))
            .and(path(self.path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(self.ctx.server)
            .await;
    }

    /// Mock GET returning 404 Not Found.
    pub async fn get_not_found(self) {
        Mock::given(method("GET"))
            .and(path(self.path()))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest/issues/issues#get-an-issue"
            })))
            .mount(self.ctx.server)
            .await;
    }

    /// Mock GET returning a 200 whose body is not an issue.
    pub async fn get_malformed(self) {
        Mock::given(method("GET"))
            .and(path(self.path()))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(self.ctx.server)
            .await;
    }

    /// Mock PATCH accepting any body, expected exactly once.
    pub async fn update(self) {
        Mock::given(method("PATCH"))
            .and(path(self.path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(self.ctx.server)
            .await;
    }

    /// Mock PATCH that only matches the given JSON body, expected exactly once.
    pub async fn update_with(self, expected: serde_json::Value) {
        Mock::given(method("PATCH"))
            .and(path(self.path()))
            .and(body_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(self.ctx.server)
            .await;
    }

    /// Mock PATCH rejected with `status`.
    pub async fn update_failing(self, status: u16) {
        Mock::given(method("PATCH"))
            .and(path(self.path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "message": "Validation Failed"
            })))
            .mount(self.ctx.server)
            .await;
    }
}

pub struct MockPageBuilder<'a> {
    ctx: &'a MockRepoContext<'a>,
    numbers: Vec<u64>,
    page: Option<u32>,
    next_page: Option<u32>,
    next_link_path: Option<&'a str>,
    status: u16,
    query: Vec<(&'a str, &'a str)>,
}

impl<'a> MockPageBuilder<'a> {
    /// Serve this listing as page `page` of the follow-up pages.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Add a `Link: <...page=N>; rel="next"` header.
    pub fn next_page(mut self, page: u32) -> Self {
        self.next_page = Some(page);
        self
    }

    /// Add a `Link` header whose next URL is this server's URI followed by `path`, verbatim.
    pub fn next_link_path(mut self, path: &'a str) -> Self {
        self.next_link_path = Some(path);
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Only match requests carrying this query parameter.
    pub fn query(mut self, key: &'a str, value: &'a str) -> Self {
        self.query.push((key, value));
        self
    }

    pub async fn mount(self) {
        let ctx = self.ctx;
        let issues: Vec<_> = self
            .numbers
            .iter()
            .map(|&n| mock_issue(ctx.owner, ctx.repo, n, &format!("Issue {n}"), "open", None))
            .collect();

        let mut response = ResponseTemplate::new(self.status).set_body_json(issues);
        if let Some(next) = self.next_page {
            let uri = ctx.server.uri();
            let link = format!(
                r#"<{uri}{PAGES_PATH}?page={next}>; rel="next", <{uri}{PAGES_PATH}?page=1>; rel="first""#
            );
            response = response.insert_header("link", link.as_str());
        }
        if let Some(next) = self.next_link_path {
            let link = format!(r#"<{}{next}>; rel="next""#, ctx.server.uri());
            response = response.insert_header("link", link.as_str());
        }

        let mut mock = match self.page {
            Some(page) => Mock::given(method("GET"))
                .and(path(PAGES_PATH))
                .and(query_param("page", page.to_string())),
            None => Mock::given(method("GET")).and(path(ctx.issues_path())),
        };
        for (key, value) in self.query {
            mock = mock.and(query_param(key, value));
        }
        mock.respond_with(response).mount(ctx.server).await;
    }
}
