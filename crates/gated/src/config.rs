//! Configuration for gated

use anyhow::Context;
use clap::{Parser, ValueEnum};
use gate_ledger_core::fees::FeeTable;
use gate_ledger_core::LedgerConfig;
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// gated - Market hub gate terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "gated")]
#[command(author, version, about = "Market hub gate terminal", long_about = None)]
pub struct Config {
    /// Parking slots in the hub
    #[arg(long, env = "GATE_TOTAL_SLOTS", default_value = "150")]
    pub total_slots: u32,

    /// Prefix printed on chit tokens
    #[arg(long, env = "GATE_TOKEN_PREFIX", default_value = "MM")]
    pub token_prefix: String,

    /// Fee charged to regulars
    #[arg(long, default_value = "1500")]
    pub regular_fee: u64,

    /// Fee charged to first-time and occasional visitors
    #[arg(long, default_value = "3000")]
    pub standard_fee: u64,

    /// Check-ins after which a plate counts as a regular
    #[arg(long, default_value = "5")]
    pub regular_visit_threshold: u32,

    /// JSON fee table; overrides the individual fee flags
    #[arg(long, env = "GATE_FEE_TABLE")]
    pub fee_table: Option<PathBuf>,

    /// Seed the ledger with the sample manifest
    #[arg(long)]
    pub demo: bool,

    /// Print records as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Gate events kept for `history`
    #[arg(long, default_value = "1000")]
    pub event_log_capacity: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log format
    #[arg(long, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.total_slots == 0 {
            anyhow::bail!("Total slots must be at least 1");
        }
        if self.token_prefix.is_empty()
            || !self.token_prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            anyhow::bail!(
                "Token prefix must be ASCII letters or digits, got {:?}",
                self.token_prefix
            );
        }
        if self.event_log_capacity == 0 {
            anyhow::bail!("Event log capacity must be at least 1");
        }
        Ok(())
    }

    /// Build the ledger configuration, loading the fee table file if given
    pub fn ledger_config(&self) -> anyhow::Result<LedgerConfig> {
        let fees = match &self.fee_table {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading fee table {}", path.display()))?;
                serde_json::from_str::<FeeTable>(&raw)
                    .with_context(|| format!("parsing fee table {}", path.display()))?
            }
            None => FeeTable {
                regular_fee: self.regular_fee,
                standard_fee: self.standard_fee,
                regular_visit_threshold: self.regular_visit_threshold,
            },
        };

        let config = LedgerConfig {
            total_slots: self.total_slots,
            token_prefix: self.token_prefix.to_uppercase(),
            fees,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        format!("gated={level},gate_ledger_core={level}")
    }
}
