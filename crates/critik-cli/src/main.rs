//! # critik-cli
//!
//! Command-line interface for Critik.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use critik_assistant::{ReviewAssistant, SessionHandle};
use critik_core::{Config, TokenLimits};

/// Critik - automated code-review assistant
#[derive(Parser)]
#[command(name = "critik")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective configuration
    Config,
    /// Show token budgets for a model, or for both configured models
    Limits {
        /// Model identifier
        model: Option<String>,
    },
    /// Evaluate the configured path filters against paths
    CheckPath {
        /// Paths to evaluate
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Send one message within a conversation, resuming from a session file
    Chat {
        /// Message text
        #[arg(short, long)]
        message: String,

        /// Use the heavy (detailed review) model instead of the light one
        #[arg(long)]
        heavy: bool,

        /// Transcript file persisted between invocations
        #[arg(short, long, value_name = "FILE")]
        session: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Malformed configuration aborts here, before anything else runs
    let config = Config::load_validated()?;

    match cli.command {
        Commands::Config => {
            config.print();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Limits { model } => match model {
            Some(model) => print_limits(&model),
            None => {
                print_limits(&config.gemini.light_model);
                print_limits(&config.gemini.heavy_model);
            }
        },
        Commands::CheckPath { paths } => {
            let filter = config.path_filter()?;
            for path in paths {
                let verdict = if filter.check(&path) {
                    "included"
                } else {
                    "excluded"
                };
                println!("{path}: {verdict}");
            }
        }
        Commands::Chat {
            message,
            heavy,
            session,
        } => {
            chat(&config, &message, heavy, session.as_deref()).await?;
        }
    }

    Ok(())
}

fn print_limits(model: &str) {
    let limits = TokenLimits::for_model(model);
    println!(
        "{model}: {limits}, knowledge_cutoff={}",
        limits.knowledge_cutoff
    );
}

/// One exchange; only the transcript half of the handle crosses process
/// boundaries, so each invocation resumes from the session file.
async fn chat(
    config: &Config,
    message: &str,
    heavy: bool,
    session: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let assistant = if heavy {
        ReviewAssistant::heavy(config)?
    } else {
        ReviewAssistant::light(config)?
    };
    tracing::info!("using model {}", assistant.model_id());

    let handle = match session {
        Some(path) if path.exists() => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read session file {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("malformed session file {}", path.display()))?
        }
        _ => SessionHandle::default(),
    };

    let (reply, handle) = assistant.converse(message, handle).await;

    if reply.is_empty() {
        // No session progress was made; leave any existing session file alone.
        eprintln!("no response produced");
        return Ok(());
    }

    println!("{reply}");

    if let Some(path) = session {
        std::fs::write(path, serde_json::to_string_pretty(&handle)?)
            .with_context(|| format!("failed to write session file {}", path.display()))?;
    }

    Ok(())
}
