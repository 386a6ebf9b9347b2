//! promptgen - submit a prompt to a generation service and fetch the result.
//!
//! Opens a small terminal page with a prompt input, a generate button, a
//! status label and a download button. `--pipe` runs one submission
//! non-interactively for scripting.

mod client;
mod config;
mod download;
mod error;
mod protocol;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ConsolePage, Phase, PromptClient, TerminalPage};
use config::Config;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "promptgen")]
#[command(author, version, about = "Submit a prompt to a generation service and download the result")]
#[command(long_about = "Submit a prompt to a generation service and download the result.\n\nWithout --pipe an interactive page opens: Enter generates, Ctrl+D downloads, Esc quits.")]
struct Cli {
    /// Prompt to prefill (interactive) or submit (--pipe)
    #[arg(value_name = "PROMPT")]
    prompt: Option<String>,

    /// No TUI, submit once and print the download URL (for scripting)
    #[arg(long)]
    pipe: bool,

    /// With --pipe, also download the artifact and print its local path
    #[arg(short = 'd', long)]
    download: bool,

    /// Override the service base URL
    #[arg(short = 'u', long, value_name = "URL")]
    base_url: Option<String>,

    /// Override the download directory
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the generation service is reachable
    Health,
    /// Open configuration file in $EDITOR
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config) => handle_config(),
        Some(Commands::Health) => {
            init_logging();
            let config = load_config(&cli)?;
            handle_health(&config).await
        }
        None => {
            let config = load_config(&cli)?;
            if cli.pipe {
                init_logging();
                handle_pipe(cli.prompt, cli.download, &config).await
            } else {
                handle_interactive(cli.prompt, &config).await
            }
        }
    }
}

/// Log to stderr. Never called for the TUI, which owns the screen.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("promptgen=error,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    Ok(Config::load()
        .context("Failed to load configuration")?
        .with_overrides(cli.base_url.clone(), cli.output_dir.clone()))
}

/// Run the interactive terminal page.
async fn handle_interactive(prompt: Option<String>, config: &Config) -> Result<()> {
    let client = PromptClient::attach(TerminalPage::new(), &config.service)?;
    client::run_tui(Arc::new(client), config.download.clone(), prompt).await
}

/// Submit one prompt without a UI.
async fn handle_pipe(prompt: Option<String>, download: bool, config: &Config) -> Result<()> {
    let prompt = prompt.ok_or_else(|| anyhow::anyhow!("Prompt required in --pipe mode"))?;

    let client = PromptClient::attach(ConsolePage::new(prompt), &config.service)?;
    info!("Submitting to {}", client.base_url());

    let url = match client.generate().await {
        Phase::Ready(url) => url,
        // Status text is already on stderr
        _ => std::process::exit(1),
    };

    if !download {
        println!("{}", url);
        return Ok(());
    }

    client.trigger_download();
    if let Some(target) = client.page().take_navigation() {
        let path = download::fetch_artifact(client.http(), &target, &config.download)
            .await
            .context("Failed to download artifact")?;
        println!("{}", path.display());
    }
    Ok(())
}

/// Print the service's health report.
async fn handle_health(config: &Config) -> Result<()> {
    let http = client::build_http(&config.service)?;
    match client::check_health(&http, &config.service.base_url).await {
        Ok(health) => {
            println!("Service: {}", config.service.base_url);
            println!("Status: {}", health.status);
            if !health.message.is_empty() {
                println!("Message: {}", health.message);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Service: {}", config.service.base_url);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the config command.
fn handle_config() -> Result<()> {
    let config_path = Config::config_path()?;

    // Create default config if it doesn't exist
    if !config_path.exists() {
        Config::default().save()?;
        println!("Created default config at {}", config_path.display());
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = ProcessCommand::new(&editor)
        .arg(&config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        eprintln!("Editor exited with non-zero status");
    }

    Ok(())
}
