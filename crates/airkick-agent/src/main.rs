// ============================================
// File: crates/airkick-agent/src/main.rs
// ============================================
//! # AirKick Entry Point
//!
//! ## Creation Reason
//! CLI for the station-kick watchdog. Handles argument parsing, logging
//! setup, configuration loading, and command dispatch.
//!
//! ## Usage
//! ```bash
//! # Run the scheduler daemon (AIRKICK_SCHEDULE required)
//! airkick run
//!
//! # Kick the station once and exit
//! airkick once
//!
//! # Print the station identifier the device would be asked to kick
//! airkick station
//!
//! # Check the environment configuration without touching the device
//! airkick validate
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `run` never exits between ticks; a failed tick is logged and the
//!   next one still fires. Only startup problems terminate the process.
//!
//! ## Last Modified
//! v0.2.0 - Subcommand CLI replacing the script snapshots

use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use airkick_agent::config::ENV_SCHEDULE;
use airkick_agent::{AgentConfig, AgentError, HttpBridge, KickPipeline, KickScheduler};

// ============================================
// CLI Definition
// ============================================

/// Wireless bridge station-kick watchdog.
///
/// Logs into the bridge's web UI and disconnects the configured station so
/// a wedged wireless link re-associates without a power cycle.
#[derive(Parser, Debug)]
#[command(name = "airkick")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the watchdog on the configured schedule
    Run,

    /// Authenticate and kick the station once, then exit
    Once,

    /// Authenticate and print the derived station identifier (no kick)
    Station,

    /// Check that the environment configuration is complete
    Validate,
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging("info");

    let result = match cli.command {
        Commands::Run => cmd_run().await,
        Commands::Once => cmd_once().await,
        Commands::Station => cmd_station().await,
        Commands::Validate => cmd_validate().await,
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Runs the scheduler daemon until interrupted.
async fn cmd_run() -> anyhow::Result<()> {
    let config = AgentConfig::from_env()?;

    // Re-initialize logging with the configured level.
    init_logging(&config.log_level);

    let schedule = config.schedule()?.clone();
    let driver = HttpBridge::new(&config)?;
    let pipeline = KickPipeline::new(driver, &config);
    let scheduler = KickScheduler::new(pipeline, schedule);

    info!(
        gateway = %config.gateway,
        interface = %config.sta_interface,
        "airkick starting"
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            let _ = shutdown_tx.send(());
        }
    });

    scheduler.run(shutdown_rx).await;
    Ok(())
}

/// Kicks the station once; the exit code reports the outcome.
async fn cmd_once() -> anyhow::Result<()> {
    let config = AgentConfig::from_env()?;
    init_logging(&config.log_level);

    let pipeline = KickPipeline::new(HttpBridge::new(&config)?, &config);
    let report = pipeline.run_once().await.map_err(AgentError::from)?;

    info!(
        "station {} kicked in {}ms",
        report.station,
        report.elapsed.as_millis()
    );
    Ok(())
}

/// Prints the station identifier derived from the device's board metadata.
async fn cmd_station() -> anyhow::Result<()> {
    let config = AgentConfig::from_env()?;
    init_logging(&config.log_level);

    let pipeline = KickPipeline::new(HttpBridge::new(&config)?, &config);
    let station = pipeline.resolve_station().await.map_err(AgentError::from)?;

    println!("{station}");
    Ok(())
}

/// Validates the environment configuration without touching the device.
async fn cmd_validate() -> anyhow::Result<()> {
    let config = AgentConfig::from_env()?;

    println!("Configuration is valid");
    println!();
    println!("Gateway:    {}", config.gateway);
    println!("Interface:  {}", config.sta_interface);
    match &config.schedule {
        Some(schedule) => println!("Schedule:   {}", schedule.expr()),
        None => println!("Schedule:   (not set - required for 'run')"),
    }
    println!("Timeout:    {}s", config.request_timeout.as_secs());
    println!(
        "TLS:        {}",
        if config.accept_invalid_certs {
            "self-signed certificate accepted"
        } else {
            "certificate verification enforced"
        }
    );
    if config.schedule.is_none() {
        println!();
        println!("Set {ENV_SCHEDULE} before using 'airkick run'.");
    }

    Ok(())
}

// ============================================
// Helper Functions
// ============================================

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .ok();
}
