//! `wt`: Warranty Tracker command line.

use anyhow::Result;
use clap::Parser;
use wt_cli::{build_ledger, execute, Args};
use wt_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if args.verbose {
        telemetry = telemetry.with_level("debug");
    }
    init_telemetry(&telemetry)?;

    let mut ledger = build_ledger(&args)?;
    let output = execute(&args.command, &mut ledger).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
