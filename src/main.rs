mod app;
mod cli;
mod commands;
mod config;
mod dispatch;
mod error;
mod error_ext;
mod session;
mod terminal;
mod transcript;
mod transport;

use app::App;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::ClawsConfig;
use error::Result;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use terminal::{RawModeGuard, TerminalSink};
use tokio::sync::mpsc;
use transport::WsTransport;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let workspace = env::current_dir().map_err(|e| {
        error::ClawsError::Config(format!("Failed to get current directory: {}", e))
    })?;

    let mut config = match ClawsConfig::load(&workspace) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".bright_red().bold(), e);
            std::process::exit(1);
        }
    };
    cli.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("{} {}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }

    let mut app = App::new(WsTransport, config);

    let (keys_tx, keys_rx) = mpsc::channel(64);
    let running = Arc::new(AtomicBool::new(true));

    let guard = RawModeGuard::new();
    if guard.is_none() {
        eprintln!("{} terminal does not support raw mode", "Warning:".bright_yellow());
    }
    let key_reader = terminal::spawn_key_reader(keys_tx, Arc::clone(&running));

    let mut sink = TerminalSink::new(std::io::stdout());
    let result = app.run(&mut sink, keys_rx).await;

    running.store(false, Ordering::SeqCst);
    let _ = key_reader.join();
    drop(guard);
    println!();

    result
}
