use bizops::BizOpsClient;
use bizops_cli::commands::{self, Cli};
use bizops_cli::config::{self, ConfigValidationError};
use bizops_cli::logger;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let app_config = match config::load_config(cli.config.as_deref()).into_result() {
        Ok(app_config) => app_config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::setup_logger(app_config.logging(), cli.log_level.as_deref()) {
        eprintln!("Failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }

    let result = if cli.command.needs_client() {
        match BizOpsClient::new(app_config.client_options()) {
            Ok(client) => commands::run_online(&cli.command, &client).await,
            Err(e) => {
                eprintln!("{}", ConfigValidationError::from(e).user_message());
                return ExitCode::FAILURE;
            }
        }
    } else {
        commands::run_offline(&cli.command, &app_config)
    };

    match result {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if outcome.success {
                ExitCode::SUCCESS
            } else {
                log::warn!("Some batches failed; see the errors in the report");
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            log::error!("Command failed: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
