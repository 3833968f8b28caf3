//! `ranking-bot`: runs the leaderboard bot over the console transport.
//!
//! Reads chat lines from stdin and writes rendered replies to stdout.
//! Commands are handled in arrival order; an open reset prompt does not hold
//! up the lines after it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ranking_bot::console::{self, Roster};
use ranking_bot::{BotConfig, Dispatcher, Response};
use ranking_core::LeaderboardStore;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Points leaderboard bot
#[derive(Parser)]
#[command(name = "ranking-bot")]
#[command(about = "Community points leaderboard bot", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "RANKING_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(long, env = "RANKING_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "RANKING_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BotConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BotConfig::default(),
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.general.log_level.clone());
    init_tracing(&level, cli.json);

    let store = Arc::new(LeaderboardStore::open(&config.persistence).context("opening store")?);
    let roster = Roster::from_entries(&config.members);
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), &config));
    let prefix = config.general.command_prefix.clone();

    let (tx, mut rx) = mpsc::unbounded_channel::<Response>();
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = rx.recv().await {
            let line = format!("{}\n", response.render());
            let written = match stdout.write_all(line.as_bytes()).await {
                Ok(()) => stdout.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                debug!(error = %e, "Stdout closed, dropping remaining replies");
                break;
            }
        }
    });

    if roster.is_empty() {
        warn!("No [[members]] configured; every command will be rejected");
    }
    info!(
        store = %store.location(),
        members = roster.len(),
        prefix = %prefix,
        "Bot is ready to track player rankings!"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    console::serve(stdin, &prefix, &roster, &dispatcher, &tx).await?;

    drop(tx);
    printer.await?;
    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Logs go to stderr so stdout carries only bot replies.
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
