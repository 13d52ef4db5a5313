//! factlens CLI entry point.

use anyhow::Result;
use clap::Parser;

use factlens::cli::commands::analyze::AnalyzeArgs;
use factlens::cli::commands::{self, load_config};
use factlens::cli::{handle_error, Cli, Commands};
use factlens::domain::models::Config;
use factlens::infrastructure::logging::{LogConfig, LoggerImpl};
use factlens::infrastructure::AppContext;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Held for the whole process so buffered file logs are flushed on exit.
    let _logger = match LogConfig::try_from(&config.logging).and_then(|c| LoggerImpl::init(&c)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    if let Err(err) = run(cli.command, config, cli.json).await {
        handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config: Config, json_mode: bool) -> Result<()> {
    if let Commands::Init { force } = command {
        return commands::init::execute(force, &config, json_mode).await;
    }

    let ctx = AppContext::from_config(config).await?;
    let result = match command {
        Commands::Analyze {
            url,
            file,
            save,
            title,
        } => {
            let args = AnalyzeArgs {
                url,
                file,
                save,
                title,
            };
            commands::analyze::execute(args, &ctx, json_mode).await
        }
        Commands::Report(cmd) => commands::report::execute(cmd, &ctx, json_mode).await,
        Commands::Status => commands::status::execute(&ctx, json_mode).await,
        Commands::Init { .. } => Ok(()),
    };
    ctx.close().await;
    result
}
