mod commands;
mod configuration;
mod error;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reagent::AgentKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::configuration::Settings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a single question and exit
    Run {
        /// Agent to use (react, plan or conversational), overrides the configured kind
        #[arg(short, long)]
        agent: Option<AgentKind>,

        /// TOML configuration file, REAGENT_* environment variables take precedence
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print every recorded step after the answer
        #[arg(long)]
        trace: bool,

        question: String,
    },

    /// Start an interactive session with the conversational agent
    Chat {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the tools available to agents
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reagent=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            agent,
            config,
            trace,
            question,
        } => {
            let settings = Settings::load(config.as_deref())?;
            commands::run::execute(settings, agent, trace, &question).await
        }
        Command::Chat { config } => {
            let settings = Settings::load(config.as_deref())?;
            commands::chat::execute(settings).await
        }
        Command::Tools => commands::tools::execute(),
    }
}
