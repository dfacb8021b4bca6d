//! Issue search and report.

use anyhow::Context;
use clap::Args;
use indoc::formatdoc;

use super::CommandContext;
use crate::infra::github::{Issue, IssueAgent, SearchParams};
use crate::shared::env_var;

const SEPARATOR: &str = "-----------------------------------------";
const DEFAULT_PER_PAGE: &str = "100";

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct FetchArgs {
    /// Repository to search (owner/repo)
    #[arg(short, long, env = env_var::REPO)]
    pub repo: String,

    /// Print a single issue instead of searching
    #[arg(short = 'n', long = "number", conflicts_with = "params")]
    pub number: Option<u64>,

    /// Search parameters, e.g. state=closed labels=bug
    #[arg(value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

/// Parse a `key=value` search parameter.
fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.contains('=') => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => Err(format!("Invalid parameter format: {s:?}")),
    }
}

#[tokio::main]
pub async fn run(args: &FetchArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let agent = ctx.agent(&args.repo)?;
    let output = fetch_report(agent, args).await?;
    print!("{output}");
    Ok(())
}

async fn fetch_report(mut agent: IssueAgent, args: &FetchArgs) -> anyhow::Result<String> {
    if let Some(number) = args.number {
        let issue = agent
            .get_issue(number)
            .await
            .with_context(|| format!("Failed to fetch issue {number} from {}", args.repo))?;
        return Ok(format_issue(&issue));
    }

    agent.add_param("per_page", DEFAULT_PER_PAGE);
    let params: SearchParams = args.params.iter().cloned().collect();
    let issues = agent
        .fetch_issues(&params)
        .await
        .with_context(|| format!("Failed to search issues in {}", args.repo))?;
    Ok(format_issue_list(&issues))
}

fn format_issue(issue: &Issue) -> String {
    let reporter = match &issue.user {
        Some(user) => format!("{}({})", user.login, user.id),
        None => "unknown".to_string(),
    };
    formatdoc! {"
        Number:    {number}
        Title:     {title}
        Reporter:  {reporter}
        URL:       {url}
        State:     {state}
        ",
        number = issue.number,
        title = issue.title,
        url = issue.html_url,
        state = issue.state,
    }
}

fn format_issue_list(issues: &[Issue]) -> String {
    let mut out = format!("There are {} issues in the query\n", issues.len());
    for issue in issues {
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(&format_issue(issue));
    }
    out
}
