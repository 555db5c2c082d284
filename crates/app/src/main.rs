mod cli;
mod commands;
mod config;
mod prompt;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tally_client::HttpTransport;
use tally_editor::{EditorError, RuleSetEditor};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;
use crate::prompt::TerminalPrompter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The editor has already alerted the user about its own errors.
            if e.downcast_ref::<EditorError>().is_none() {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.server, cli.lang)?;

    let endpoint = config.endpoint_url();
    let transport = match config.timeout() {
        Some(timeout) => HttpTransport::with_timeout(&endpoint, timeout)?,
        None => HttpTransport::new(&endpoint),
    };
    tracing::info!(endpoint = transport.endpoint(), language = %config.language, "starting");

    let mut editor = RuleSetEditor::new(transport, TerminalPrompter::new(cli.yes), config.language);
    commands::run(&mut editor, cli.command).await
}
