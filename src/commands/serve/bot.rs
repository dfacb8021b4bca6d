//! Slash-command handling for the issue bot.

use tokio::sync::Mutex;

use super::alias::{AliasError, AliasTable};
use super::command::{self, AssignTarget, BotCommand, HELP};
use crate::infra::github::IssueAgent;

const NOT_REGISTERED: &str = "You are currently not registered as a github user";

/// Translates chat commands into issue operations.
///
/// All state sits behind one lock that stays held for the remote call, so
/// deliveries are handled strictly one at a time.
pub struct IssueBot {
    state: Mutex<BotState>,
}

struct BotState {
    agent: IssueAgent,
    aliases: AliasTable,
}

impl IssueBot {
    pub fn new(agent: IssueAgent) -> Self {
        Self {
            state: Mutex::new(BotState {
                agent,
                aliases: AliasTable::new(),
            }),
        }
    }

    /// Map chat handle `chat` to GitHub user `github`.
    pub async fn add_user_map(&self, chat: &str, github: &str) -> Result<(), AliasError> {
        self.state.lock().await.aliases.insert(chat, github)
    }

    /// Run the command in `text` on behalf of `requester` and return the reply.
    pub async fn handle(&self, requester: &str, text: &str) -> String {
        let command = match command::parse(text) {
            Ok(command) => command,
            Err(usage) => {
                tracing::debug!(requester, text, "rejected command arguments");
                return usage.to_string();
            }
        };
        tracing::info!(requester, ?command, "handling command");

        let mut state = self.state.lock().await;
        state.execute(requester, command).await
    }
}

impl BotState {
    async fn execute(&mut self, requester: &str, command: BotCommand) -> String {
        match command {
            BotCommand::Help => HELP.to_string(),
            BotCommand::Find(number) => self.find(number).await,
            BotCommand::Close(number) => match self.agent.close_issue(number).await {
                Ok(()) => format!("Issue {number} successfully closed"),
                Err(e) => {
                    tracing::warn!(issue = number, error = %e, "unable to close issue");
                    format!("Unable to close issue {number}")
                }
            },
            BotCommand::Reopen(number) => match self.agent.open_issue(number).await {
                Ok(()) => format!("Issue {number} successfully reopened"),
                Err(e) => {
                    tracing::warn!(issue = number, error = %e, "unable to reopen issue");
                    format!("Unable to reopen issue {number}")
                }
            },
            BotCommand::Assign { number, target } => self.assign(requester, number, target).await,
            BotCommand::Unassign(number) => match self.agent.unassign_issue(number).await {
                Ok(()) => format!("Issue {number} is no longer assigned to anyone"),
                Err(e) => {
                    tracing::warn!(issue = number, error = %e, "unable to unassign issue");
                    format!("Unable to unassign issue {number}")
                }
            },
            BotCommand::Register(github) => match self.aliases.insert(requester, &github) {
                Ok(()) => {
                    tracing::info!(chat = requester, github = %github, "registered alias");
                    format!("You are now registered as github user {github:?}")
                }
                Err(e) => format!("Unable to register as github user {github:?}: conflict, {e}"),
            },
            BotCommand::GetAlias => match self.aliases.github_for(requester) {
                Some(github) => format!("You are currently registered as github user {github:?}"),
                None => NOT_REGISTERED.to_string(),
            },
            BotCommand::Unregister => match self.aliases.remove_by_chat(requester) {
                Some(github) => {
                    tracing::info!(chat = requester, github = %github, "removed alias");
                    format!("You are no longer registered as github user {github:?}")
                }
                None => NOT_REGISTERED.to_string(),
            },
        }
    }

    async fn find(&self, number: u64) -> String {
        let issue = match self.agent.get_issue(number).await {
            Ok(issue) => issue,
            Err(e) => {
                tracing::warn!(issue = number, error = %e, "unable to find issue");
                return format!("Unable to find issue {number}");
            }
        };

        let mut reply = format!(
            "Issue {number}: {:?}\n\tURL: {}\n\tState: {}",
            issue.title, issue.html_url, issue.state
        );
        if let Some(assignee) = &issue.assignee {
            let who = match self.aliases.chat_for(&assignee.login) {
                Some(handle) => format!("@{handle}"),
                None => assignee.login.clone(),
            };
            reply.push_str(&format!("\n\tAssigned to: {who}"));
        }
        reply
    }

    async fn assign(&self, requester: &str, number: u64, target: AssignTarget) -> String {
        let (name, github) = match target {
            AssignTarget::GitHub(login) => (login.clone(), login),
            AssignTarget::Me => match self.aliases.github_for(requester) {
                Some(github) => (format!("@{requester}"), github.to_string()),
                None => return format!("\"@{requester}\" is not registered"),
            },
            AssignTarget::Chat(handle) => match self.aliases.github_for(&handle) {
                Some(github) => (format!("@{handle}"), github.to_string()),
                None => return format!("\"@{handle}\" is not registered"),
            },
        };

        match self.agent.assign_issue(number, &github).await {
            Ok(()) => format!("Issue {number} is now assigned to {name}"),
            Err(e) => {
                tracing::warn!(
                    issue = number,
                    github = %github,
                    error = %e,
                    "unable to assign issue"
                );
                format!("Unable to assign issue {number} to {name:?}")
            }
        }
    }
}
