//! # PostQuell
//!
//! Composition root: reads configuration, opens the post store on its
//! durable slot and runs the requested command.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod state;
mod telemetry;
mod views;

use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::debug!(?config, ?cli, "Configuration loaded");

    let state = AppState::new(&config.storage);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run_command(cli, &config, &state, &mut out)
}
