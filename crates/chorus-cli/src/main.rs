use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use chorus_core::{Dispatcher, ProviderId};

mod config;

use config::ChorusConfig;

#[derive(Parser)]
#[command(name = "chorus")]
#[command(version)]
#[command(about = "Ask one AI provider, or all of them")]
struct Cli {
    /// Provider to ask: openai, anthropic, or google
    #[arg(short, long, default_value = "openai")]
    agent: String,

    /// The prompt to send
    #[arg(short, long)]
    prompt: Option<String>,

    /// Fan the prompt out to every provider and show all answers
    #[arg(long)]
    compare: bool,

    /// Check which provider credentials are configured
    #[arg(long)]
    doctor: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let cfg = ChorusConfig::load(&cli.config)?;
    debug!("Config: {:?}", cfg);
    let dispatcher = Dispatcher::from_env(&cfg.settings());

    if cli.doctor {
        return cmd_doctor(&dispatcher);
    }

    let prompt = match cli.prompt.as_deref() {
        Some(p) if !p.trim().is_empty() => p,
        _ => {
            eprintln!("error: --prompt is required (see --help)");
            std::process::exit(1);
        }
    };

    if cli.compare {
        cmd_compare(&dispatcher, prompt).await
    } else {
        cmd_ask(&dispatcher, prompt, &cli.agent).await
    }
}

/// Ask a single provider; exit 1 if it produced no result.
async fn cmd_ask(dispatcher: &Dispatcher, prompt: &str, agent: &str) -> Result<()> {
    let id: ProviderId = match agent.parse() {
        Ok(id) => id,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match dispatcher.generate(prompt, id).await {
        Some(text) => {
            println!("{text}");
            Ok(())
        }
        None => {
            if dispatcher.is_configured(id) {
                eprintln!("{} produced no result", id.display_name());
            } else {
                eprintln!(
                    "{} is not configured (set {})",
                    id.display_name(),
                    id.env_key()
                );
            }
            std::process::exit(1);
        }
    }
}

/// Fan the prompt out to all providers and print each answer in turn.
async fn cmd_compare(dispatcher: &Dispatcher, prompt: &str) -> Result<()> {
    for (id, outcome) in dispatcher.generate_all(prompt).await {
        println!("── {} ──", id.display_name());
        match outcome {
            Some(text) => println!("{text}\n"),
            None => println!("(no response)\n"),
        }
    }
    Ok(())
}

/// Report per-provider credential status; exit 1 if any is missing.
fn cmd_doctor(dispatcher: &Dispatcher) -> Result<()> {
    let mut all_present = true;
    for (id, configured) in dispatcher.configured() {
        if configured {
            println!("✓ {} configured", id.display_name());
        } else {
            println!("✗ {} missing ({} not set)", id.display_name(), id.env_key());
            all_present = false;
        }
    }
    if !all_present {
        std::process::exit(1);
    }
    Ok(())
}
