//! Webhook endpoint for slash-command deliveries.

use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::routing::post;
use thiserror::Error;

use super::bot::IssueBot;

const MALFORMED_REQUEST: &str = "Error: malformed request";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("{0:?} field missing or malformed in request")]
    BadField(&'static str),
}

pub type Result<T> = std::result::Result<T, RequestError>;

pub fn build_router(bot: Arc<IssueBot>, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(handle_delivery))
        .with_state(bot)
}

/// Every outcome, including a bad request, is a 200 with a plain-text body.
async fn handle_delivery(
    State(bot): State<Arc<IssueBot>>,
    form: std::result::Result<Form<Vec<(String, String)>>, FormRejection>,
) -> String {
    let Form(fields) = match form {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "error processing request");
            return MALFORMED_REQUEST.to_string();
        }
    };

    let (text, user_name) = match (form_field(&fields, "text"), form_field(&fields, "user_name")) {
        (Ok(text), Ok(user_name)) => (text, user_name),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "error processing request");
            return MALFORMED_REQUEST.to_string();
        }
    };

    bot.handle(user_name, text).await
}

/// Value of `name`, which must occur exactly once.
fn form_field<'a>(fields: &'a [(String, String)], name: &'static str) -> Result<&'a str> {
    let mut values = fields.iter().filter(|(key, _)| key == name);
    match (values.next(), values.next()) {
        (Some((_, value)), None) => Ok(value),
        _ => Err(RequestError::BadField(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::github::mock::GitHubMockServer;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use rstest::rstest;
    use tower::ServiceExt;

    fn pairs(fields: &[(&str, &str)]) -> Vec<(String, String)> {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[rstest]
    #[case::present(&[("text", "find 1"), ("user_name", "alice")], "text", Ok("find 1"))]
    #[case::empty_value(&[("text", ""), ("user_name", "alice")], "text", Ok(""))]
    #[case::missing(&[("user_name", "alice")], "text", Err(RequestError::BadField("text")))]
    #[case::repeated(
        &[("user_name", "alice"), ("user_name", "bob")],
        "user_name",
        Err(RequestError::BadField("user_name"))
    )]
    fn test_form_field(
        #[case] fields: &[(&str, &str)],
        #[case] name: &'static str,
        #[case] expected: Result<&str>,
    ) {
        assert_eq!(form_field(&pairs(fields), name), expected);
    }

    async fn post_form(app: Router, uri: &str, body: &'static str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn delivery_dispatches_to_bot() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo")
            .issue(42)
            .update_with(serde_json::json!({"assignees": ["alice-gh"]}))
            .await;
        let bot = Arc::new(IssueBot::new(mock.agent("owner/repo")));
        bot.add_user_map("alice", "alice-gh").await.unwrap();
        let app = build_router(bot, "/issue");

        let (status, body) =
            post_form(app, "/issue", "text=assign+42+%40me&user_name=alice").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Issue 42 is now assigned to @alice");
    }

    #[rstest]
    #[case::missing_text("user_name=alice")]
    #[case::missing_user("text=help")]
    #[case::duplicate_text("text=help&text=find+1&user_name=alice")]
    #[tokio::test]
    async fn malformed_delivery_is_reported_in_band(#[case] body: &'static str) {
        let mock = GitHubMockServer::start().await;
        let bot = Arc::new(IssueBot::new(mock.agent("owner/repo")));
        let app = build_router(bot, "/issue");

        let (status, reply) = post_form(app, "/issue", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, MALFORMED_REQUEST);
        assert!(mock.received_requests().await.is_empty());
    }

    #[tokio::test]
    async fn non_form_body_is_malformed() {
        let mock = GitHubMockServer::start().await;
        let bot = Arc::new(IssueBot::new(mock.agent("owner/repo")));
        let app = build_router(bot, "/issue");

        let request = Request::builder()
            .method("POST")
            .uri("/issue")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text":"help"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), MALFORMED_REQUEST.as_bytes());
    }

    #[tokio::test]
    async fn custom_webhook_path() {
        let mock = GitHubMockServer::start().await;
        let bot = Arc::new(IssueBot::new(mock.agent("owner/repo")));
        let app = build_router(bot, "/slack/issue");

        let (status, body) = post_form(app, "/slack/issue", "text=help&user_name=alice").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, super::super::command::HELP);
    }
}
