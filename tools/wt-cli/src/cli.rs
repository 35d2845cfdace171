//! Command line arguments.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::time::Duration;
use url::Url;
use wt_01_jsonp_bridge::{BridgeConfig, ConfigError};

/// Warranty Tracker: purchased items and their warranty expiry
#[derive(Parser, Debug)]
#[command(name = "wt", version)]
#[command(about = "Track purchased items and their warranty expiry")]
pub struct Args {
    /// Remote sheet endpoint (JSONP)
    #[arg(short, long, env = "WT_ENDPOINT", global = true)]
    pub endpoint: Option<Url>,

    /// Per-call timeout, e.g. "10s" or "1m 30s"
    #[arg(short, long, value_parser = parse_duration, global = true)]
    pub timeout: Option<Duration>,

    /// Run against an in-memory sheet (no network)
    #[arg(long, global = true)]
    pub demo: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all items
    List,

    /// Load one item into the form and print it
    Show {
        id: u64,
    },

    /// Create an item
    Add {
        #[arg(long)]
        name: String,

        /// Purchase date (YYYY-MM-DD)
        #[arg(long)]
        buy_date: String,

        /// Warranty length in days
        #[arg(long, default_value_t = wt_02_item_ledger::DEFAULT_WARRANTY_PERIOD)]
        period: u32,
    },

    /// Change an existing item
    Edit {
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        buy_date: Option<String>,

        #[arg(long)]
        period: Option<u32>,
    },

    /// Items whose warranty ends within 30 days
    Expiring {
        /// Reference date instead of today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

impl Args {
    /// Bridge configuration: environment first, flags on top.
    pub fn bridge_config(&self) -> Result<BridgeConfig, ConfigError> {
        let mut config = BridgeConfig::from_env()?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        Ok(config)
    }
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(raw).map_err(|e| e.to_string())
}
