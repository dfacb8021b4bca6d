use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::config::ConfigCommands;
use crate::commands::fetch::FetchArgs;
use crate::commands::modify::ModifyArgs;
use crate::commands::serve::ServeArgs;
use crate::infra::github::DEFAULT_API_URL;
use crate::shared::env_var;
use crate::shared::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "issuebot",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct GlobalArgs {
    /// GitHub API base URL
    #[arg(long, global = true, env = env_var::API_URL, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Configuration file (default: ~/.config/issuebot/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "issuebot=trace" (default: info for serve, warn otherwise)
    #[arg(long, global = true, env = env_var::LOG)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t)]
    pub log_format: LogFormat,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Clone, PartialEq, Eq, Debug)]
pub enum Commands {
    /// Open, close, assign or unassign a single issue
    Modify(ModifyArgs),

    /// Search issues or print one issue
    Fetch(FetchArgs),

    /// Run the slash-command webhook bot
    Serve(ServeArgs),

    /// Configuration file tools
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Log filter used when none is given.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Serve(_) => "info",
            _ => "warn",
        }
    }
}
