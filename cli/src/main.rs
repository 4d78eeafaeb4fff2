use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use redact_core::{
    get_default_config_file, BlockingRedactionClient, RedactConfig, RedactionClient,
};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, info};

mod cli;
mod logging;
mod output;
mod session;

use crate::cli::{Args, Command, ConfigCommand};
use crate::output::{print_check, print_outcome};

const APP_NAME: &str = "redact-keyboard";
const CHECK_SAMPLE: &str = "Reach me at jane.doe@example.com or 555-123-4567";

fn main() -> Result<ExitCode> {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    let args = Args::parse();
    logging::init(&args.log_level)?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_file(APP_NAME)?,
    };

    match &args.command {
        Command::Redact { text } => {
            let config = load_config(&config_path, &args)?;
            // Blocking client: runs on the main thread, no async runtime involved
            let client = BlockingRedactionClient::new(&config)?;
            let outcome = client.redact(&text.join(" "));
            print_outcome(&outcome);
            Ok(exit_code(outcome.is_ok()))
        }
        Command::Check => {
            let config = load_config(&config_path, &args)?;
            runtime()?.block_on(run_check(&config))
        }
        Command::Session => {
            let config = load_config(&config_path, &args)?;
            runtime()?.block_on(session::run_session(&config))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(action) => run_config_command(action, &config_path, &args),
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to start async runtime")
}

/// Config file, then environment, then command line
fn load_config(path: &Path, args: &Args) -> Result<RedactConfig> {
    let mut config = RedactConfig::load_from_file(path)?.apply_env()?;
    if let Some(base_url) = &args.base_url {
        config.base_url = Some(base_url.clone());
    }
    config.validate()?;
    info!(endpoint = %config.endpoint(), "Using redaction service");
    debug!(config = ?config, "Effective configuration");
    Ok(config)
}

async fn run_check(config: &RedactConfig) -> Result<ExitCode> {
    let client = RedactionClient::new(config)?;
    let (tx, rx) = oneshot::channel();
    let started = Instant::now();

    client.redact_with(CHECK_SAMPLE, move |outcome| {
        let _ = tx.send(outcome);
    });
    let outcome = rx
        .await
        .map_err(|_| anyhow!("Redaction task ended without a result"))?;

    print_check(client.endpoint(), &outcome, started.elapsed());
    Ok(exit_code(outcome.is_ok()))
}

fn run_config_command(action: &ConfigCommand, path: &Path, args: &Args) -> Result<ExitCode> {
    match action {
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Show => {
            let config = load_config(path, args)?;
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print!("{}", rendered);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists, pass --force to overwrite",
                    path.display()
                );
            }
            RedactConfig::default().save_to_file(path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
