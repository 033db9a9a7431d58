use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod controller;
mod core;
mod jobs;

use crate::core::models::Platform;

#[derive(Parser)]
#[command(name = "follower-watch")]
#[command(author, version, about = "Live follower counter for Instagram and TikTok profiles")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a profile once and print it
    Fetch {
        #[arg(value_enum)]
        platform: Platform,

        username: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Fail instead of printing a placeholder profile
        #[arg(long)]
        no_fallback: bool,
    },

    /// Track a profile and refresh its follower count every few seconds
    Watch {
        #[arg(value_enum)]
        platform: Platform,

        /// Profile to search for immediately
        username: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            platform,
            username,
            json,
            no_fallback,
        } => {
            init_logging(cli.log_json);
            cli::fetch::run(platform, username, json, no_fallback).await
        }
        Commands::Watch { platform, username } => {
            init_logging(cli.log_json);
            cli::watch::run(platform, username).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
