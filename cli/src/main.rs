use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rivermind_core::config::{BASE_URL_ENV, TIMEOUT_ENV};
use rivermind_core::{ClientConfig, LogFailure, RiverMind, VideoUpload, DEFAULT_BASE_URL};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Command-line front-end for the RiverMind backend.
#[derive(Debug, Parser)]
#[command(name = "rivermind", version)]
struct Cli {
    /// Backend base address.
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds; 0 waits indefinitely.
    #[arg(long, global = true, env = TIMEOUT_ENV, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify the emotion expressed in a diary entry.
    Emotion { text: String },
    /// Upload a video for drowning detection.
    Drowning { file: PathBuf },
    /// Fetch climate readings.
    Climate,
    /// Fetch suggestions for a user.
    Suggestions { user_id: String },
}

impl Cli {
    fn config(&self) -> Result<ClientConfig> {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        let config = ClientConfig::new(&self.base_url).with_timeout(timeout).validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Issue the one call the subcommand asks for. `None` means the call failed
/// and was already logged.
fn run(cli: &Cli) -> Result<Option<Value>> {
    let api = RiverMind::new(cli.config()?);
    let result = match &cli.command {
        Command::Emotion { text } => api.analyze_emotion(text).or_log("analyze emotion"),
        Command::Drowning { file } => {
            let upload = VideoUpload::from_path(file).with_context(|| format!("reading {}", file.display()))?;
            api.detect_drowning(upload).or_log("detect drowning")
        }
        Command::Climate => api.climate_data().or_log("fetch climate data"),
        Command::Suggestions { user_id } => api.suggestions(user_id).or_log("fetch suggestions"),
    };
    Ok(result)
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli)? {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("no data");
            Ok(ExitCode::FAILURE)
        }
    }
}
