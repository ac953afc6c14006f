use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use notifier_engine::{
    HttpPortalConnector, RunError, RunSummary, Runner, StateStore, WebhookTransport,
};
use notifier_logging::{notifier_error, notifier_info};

use super::logging::{self, LogDestination};
use crate::cli::Cli;
use crate::config::{AppConfig, DEFAULT_LOG_FILENAME};

/// Runs one notification pass with the configuration named on the command line.
pub fn run_app() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            logging::initialize(LogDestination::Both, DEFAULT_LOG_FILENAME.as_ref());
            notifier_error!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };

    logging::initialize(
        LogDestination::from_config(config.log_to_terminal),
        &config.log_file,
    );
    notifier_info!("------ Run started ------");

    match run(&config) {
        Ok(summary) => {
            notifier_info!(
                "------ Run finished: {} notification(s) sent ------",
                summary.notified.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(RunError::Connection(_)) = err.downcast_ref::<RunError>() {
                notifier_error!(
                    "Unable to connect to the portal account, check the configuration file."
                );
            }
            notifier_error!("Run aborted: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> anyhow::Result<RunSummary> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let store = StateStore::new(&config.state_file);
    let transport = WebhookTransport::new(config.webhook_url.clone(), config.http_settings());
    let connector = HttpPortalConnector::new(config.credentials(), config.http_settings());
    let runner = Runner::new(store, Box::new(transport), config.run_settings());

    let today = Local::now().date_naive();
    let summary = runtime.block_on(runner.run(&connector, today))?;
    Ok(summary)
}
