//! One-shot issue mutation from the command line.

use anyhow::Context;
use clap::{Args, Subcommand};

use super::CommandContext;
use crate::infra::github::IssueAgent;
use crate::shared::auth::basic_auth;
use crate::shared::env_var;

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct ModifyArgs {
    /// Repository the issue belongs to (owner/repo)
    #[arg(short, long, env = env_var::REPO)]
    pub repo: String,

    /// Issue number
    #[arg(short = 'i', long = "issue")]
    pub number: u64,

    /// GitHub user to operate as
    #[arg(short, long, env = env_var::USER)]
    pub user: String,

    /// GitHub password or token for the user
    #[arg(short = 'a', long = "auth", env = env_var::MODIFY_PASSWORD, hide_env_values = true)]
    pub auth: String,

    #[command(subcommand)]
    pub action: ModifyAction,
}

#[derive(Subcommand, Clone, PartialEq, Eq, Debug)]
pub enum ModifyAction {
    /// Reopen the issue
    Open,
    /// Close the issue
    Close,
    /// Assign the issue to a GitHub user
    Assign {
        /// GitHub username of the new assignee
        user: String,
    },
    /// Remove every assignee from the issue
    Unassign,
}

#[tokio::main]
pub async fn run(args: &ModifyArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let agent = ctx
        .agent(&args.repo)?
        .with_token(basic_auth(&args.user, &args.auth));

    let message = apply(&agent, args.number, &args.action)
        .await
        .with_context(|| format!("Failed to modify issue {} in {}", args.number, args.repo))?;
    println!("{message}");
    Ok(())
}

/// Perform `action` on issue `number` and describe the outcome.
async fn apply(agent: &IssueAgent, number: u64, action: &ModifyAction) -> anyhow::Result<String> {
    tracing::debug!(issue = number, ?action, "modifying issue");
    let message = match action {
        ModifyAction::Open => {
            agent.open_issue(number).await?;
            format!("Issue {number} reopened")
        }
        ModifyAction::Close => {
            agent.close_issue(number).await?;
            format!("Issue {number} closed")
        }
        ModifyAction::Assign { user } => {
            agent.assign_issue(number, user).await?;
            format!("Issue {number} assigned to {user}")
        }
        ModifyAction::Unassign => {
            agent.unassign_issue(number).await?;
            format!("Issue {number} unassigned")
        }
    };
    Ok(message)
}
