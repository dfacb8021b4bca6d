mod alias;
mod bot;
mod command;
mod server;

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tokio::net::TcpListener;

use self::bot::IssueBot;
use super::CommandContext;
use crate::shared::auth::basic_auth;
use crate::shared::env_var;

#[derive(Args, Clone, PartialEq, Eq, Debug)]
pub struct ServeArgs {
    /// Repository to manage (owner/repo)
    #[arg(short, long, env = env_var::REPO)]
    pub repo: String,

    /// GitHub user the bot operates as
    #[arg(short, long, env = env_var::USER)]
    pub user: String,

    /// GitHub password or token for the bot user
    #[arg(short = 'a', long = "auth", env = env_var::AUTH, hide_env_values = true)]
    pub auth: String,

    /// Address to listen on
    #[arg(short = 'l', long = "listen", env = env_var::LISTEN_ADDR, default_value = "0.0.0.0")]
    pub addr: String,

    /// Port to listen on
    #[arg(short, long, env = env_var::LISTEN_PORT, default_value_t = 80)]
    pub port: u16,
}

#[tokio::main]
pub async fn run(args: &ServeArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let agent = ctx
        .agent(&args.repo)?
        .with_token(basic_auth(&args.user, &args.auth));

    let bot = Arc::new(IssueBot::new(agent));
    for (chat, login) in &ctx.config.bot.aliases {
        if let Err(e) = bot.add_user_map(chat, login).await {
            tracing::warn!(chat = %chat, github = %login, error = %e, "skipping configured alias");
        }
    }

    let webhook_path = &ctx.config.bot.webhook_path;
    let app = server::build_router(bot, webhook_path);

    let bind_addr = format!("{}:{}", args.addr, args.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to listen on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to resolve listen address")?;

    tracing::info!(
        addr = %local_addr,
        path = %webhook_path,
        repo = %args.repo,
        user = %args.user,
        "starting bot"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutting down");
            }
        })
        .await
        .context("Webhook server exited unexpectedly")?;
    Ok(())
}
