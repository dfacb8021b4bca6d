mod cli;
mod commands;
mod infra;
mod shared;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, GlobalArgs};
use commands::CommandContext;
use shared::config::load_config;
use shared::logging::{self, LogOptions};

fn main() -> ExitCode {
    let Cli { global, command } = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures.
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let options = LogOptions {
        filter: global
            .log_level
            .clone()
            .unwrap_or_else(|| command.default_log_level().to_string()),
        format: global.log_format,
        file: global.log_file.clone(),
    };
    let _guard = match logging::init(&options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_to_file = options.file.is_some();
    match dispatch(command, global) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            if log_to_file {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Commands, global: GlobalArgs) -> anyhow::Result<()> {
    let context = || -> anyhow::Result<CommandContext> {
        Ok(CommandContext {
            api_url: global.api_url.clone(),
            config: load_config(global.config.as_deref())?,
        })
    };

    match command {
        Commands::Modify(args) => commands::modify::run(&args, &context()?),
        Commands::Fetch(args) => commands::fetch::run(&args, &context()?),
        Commands::Serve(args) => commands::serve::run(&args, &context()?),
        Commands::Config(config_cmd) => config_cmd.run(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "issuebot", &mut std::io::stdout());
            Ok(())
        }
    }
}
