use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tally_classify::RemoteClassifier;
use tally_core::{Classifier, KeywordClassifier};
use tracing_subscriber::EnvFilter;

mod config;
mod dashboard;
mod session;
mod shell;
mod state;

use session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Personal expense tracker with automatic categorization"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session: add, import, browse and edit expenses (default)
    Shell {
        /// Categorize with keywords only; never call the remote endpoint
        #[arg(long)]
        offline: bool,
    },

    /// Print the category for a description
    Classify {
        description: String,

        #[arg(long)]
        offline: bool,
    },

    /// Categorize a headerless date,description,amount CSV and print the result
    Import {
        csv: PathBuf,

        #[arg(long)]
        offline: bool,

        /// Print transactions as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config to ~/.tally/config.toml
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Shell { offline: false }) {
        Command::Shell { offline } => {
            let mut session = Session::new(build_classifier(offline)?);
            let stdin = io::stdin();
            let mut console = shell::Console::new(stdin.lock(), io::stdout());
            println!("tally: expense tracker");
            shell::run(&mut session, &mut console)?;
        }

        Command::Classify {
            description,
            offline,
        } => {
            let classifier = build_classifier(offline)?;
            println!("{}", classifier.classify(&description));
        }

        Command::Import { csv, offline, json } => {
            let mut session = Session::new(build_classifier(offline)?);
            let ids = session.import_csv(&csv)?;

            if json {
                let txns = session.history(None);
                println!("{}", serde_json::to_string_pretty(&txns)?);
            } else {
                let mut out = io::stdout().lock();
                dashboard::render_table(&mut out, session.history(None))?;
                writeln!(out)?;
                dashboard::render_summary(&mut out, &session.summary())?;
                writeln!(out, "\nImported {} transactions from {}", ids.len(), csv.display())?;
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }
}

/// Remote classifier when enabled in config and not `--offline`, else keywords.
fn build_classifier(offline: bool) -> Result<Box<dyn Classifier>> {
    let cfg = config::load_config()?;
    if offline || !cfg.remote.enabled {
        tracing::info!("using keyword classifier");
        return Ok(Box::new(KeywordClassifier));
    }
    let remote = RemoteClassifier::new(cfg.remote.to_remote_config(|var| std::env::var(var).ok()))?;
    let rc = remote.config();
    tracing::info!(endpoint = %rc.endpoint, model = %rc.model, timeout = ?rc.timeout, "using remote classifier");
    Ok(Box::new(remote))
}
