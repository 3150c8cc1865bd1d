// src/main.rs
use clap::{CommandFactory, Parser};
use rift_aggregator::aggregate::AppContext;
use rift_aggregator::cli::Args;
use rift_aggregator::commands::{execute, handle_list_config_command, print_envelope};
use rift_aggregator::config::Config;
use rift_aggregator::error::AppError;
use rift_aggregator::logging::setup_logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    let args = Args::parse();

    if args.list_config {
        handle_list_config_command().await?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = args.command.as_ref() else {
        Args::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    // Fail fast on a missing credential before any logging or network setup.
    let config = Config::load().await?;

    let custom_log_path = args.log_file.as_deref().or(config.log_file_path.as_deref());
    let (log_file_path, _guard) = setup_logging(custom_log_path, args.debug).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    let ctx = AppContext::new(&config)?;
    let envelope = execute(&ctx, command).await;
    print_envelope(&envelope)?;

    if envelope.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!("Command finished with status {}", envelope.status);
        Ok(ExitCode::FAILURE)
    }
}
