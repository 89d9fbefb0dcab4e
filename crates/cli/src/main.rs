//! ChatRelay CLI — the main entry point.
//!
//! Commands:
//! - `chat`   — Interactive chat in the terminal
//! - `ask`    — Send a single message and print the reply
//! - `serve`  — Speak the host JSON-lines protocol over stdio
//! - `init`   — Write a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "chatrelay",
    about = "ChatRelay — chat with a text endpoint that can read and write your workspace",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat in the terminal
    Chat {
        /// Start with agent mode on
        #[arg(short, long)]
        agent: bool,

        /// Workspace folder file commands resolve against
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },

    /// Send a single message and print the reply
    Ask {
        message: String,

        /// Let the reply read or write one workspace file
        #[arg(short, long)]
        agent: bool,

        /// Workspace folder file commands resolve against
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },

    /// Serve an editor host over stdin/stdout, one JSON message per line
    Serve {
        /// Workspace folder file commands resolve against
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },

    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries replies (and protocol lines for `serve`)
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { agent, workspace } => commands::chat::run(agent, workspace).await?,
        Commands::Ask {
            message,
            agent,
            workspace,
        } => commands::ask::run(&message, agent, workspace).await?,
        Commands::Serve { workspace } => commands::serve::run(workspace).await?,
        Commands::Init => commands::init::run()?,
    }

    Ok(())
}
