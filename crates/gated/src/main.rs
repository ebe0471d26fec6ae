//! gated - market hub gate terminal
//!
//! Runs an operator console on stdin/stdout. Logs go to stderr so chits and
//! tables stay readable.

use clap::Parser;
use gate_ledger_core::GateLedger;
use gated::config::{Config, LogFormat};
use gated::console::Console;
use gated::demo::seed_demo;
use gated::event_log::EventLog;
use gated::runtime::block_on_detached;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> ExitCode {
    // Parse configuration
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    match block_on_detached(run(config)) {
        Ok(code) => code,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> ExitCode {
    info!(
        "gated v{} - Market Hub Gate Terminal",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {:#}", e);
        return ExitCode::FAILURE;
    }

    let ledger_config = match config.ledger_config() {
        Ok(ledger_config) => ledger_config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Slots: {}, token prefix: {}, fees: regular {} / standard {}",
        ledger_config.total_slots,
        ledger_config.token_prefix,
        ledger_config.fees.regular_fee,
        ledger_config.fees.standard_fee
    );

    let mut ledger = match GateLedger::new(ledger_config) {
        Ok(ledger) => ledger,
        Err(e) => {
            error!("Failed to initialize ledger: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.demo {
        match seed_demo(&mut ledger) {
            Ok(count) => info!("Seeded {} demo records", count),
            Err(e) => {
                error!("Failed to seed demo manifest: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let console = Arc::new(Console::new(
        ledger,
        EventLog::new(config.event_log_capacity),
        config.json,
    ));

    // Install signal handler
    let signal_console = console.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        signal_console.shutdown();
    });

    if let Err(e) = console
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
    {
        error!("Console error: {}", e);
        return ExitCode::FAILURE;
    }

    let summary = console.summary();
    info!(
        "Session closed: {} records, {}, {} gate events",
        summary.records, summary.occupancy, summary.events
    );

    ExitCode::SUCCESS
}
