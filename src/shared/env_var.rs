//! Environment variable names read by issuebot.
//!
//! Command-line flags always win over these; clap falls back to them when a
//! flag is absent.

/// GitHub repository ("owner/name") the bot manages.
pub const REPO: &str = "ISSUEBOT_REPO";
/// GitHub user the bot authenticates as.
pub const USER: &str = "ISSUEBOT_USER";
/// GitHub password or personal access token for `USER`.
pub const AUTH: &str = "ISSUEBOT_AUTH";
/// Address the webhook listener binds to.
pub const LISTEN_ADDR: &str = "ISSUEBOT_LADDR";
/// Port the webhook listener binds to.
pub const LISTEN_PORT: &str = "ISSUEBOT_LPORT";
/// Log filter directive, e.g. "debug" or "issuebot=trace".
pub const LOG: &str = "ISSUEBOT_LOG";
/// Override for the GitHub API base URL.
pub const API_URL: &str = "ISSUEBOT_API_URL";

/// Password fallback for the one-shot `modify` command.
pub const MODIFY_PASSWORD: &str = "GHMOD_PASSWORD";
