//! Command execution over the ledger.

use crate::cli::{Args, Command};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use wt_01_jsonp_bridge::Dispatcher;
use wt_02_item_ledger::{Clock, DemoSheet, ItemLedger, ItemService, SystemClock};
use wt_telemetry::log_event;

/// Ledger over the remote sheet, or over a seeded in-memory sheet in demo mode.
pub fn build_ledger(args: &Args) -> Result<ItemLedger> {
    let config = args
        .bridge_config()
        .context("invalid bridge configuration")?;

    let dispatcher = if args.demo {
        log_event!(info, "cli", "Demo mode: using in-memory sheet");
        DemoSheet::seeded(SystemClock.today())
            .dispatcher(config)
            .context("failed to create demo dispatcher")?
    } else {
        Dispatcher::with_http(config).context("failed to create dispatcher")?
    };
    log_event!(info, "cli", "Dispatcher ready", endpoint = %dispatcher.endpoint());

    Ok(ItemLedger::new(Arc::new(ItemService::new(dispatcher))))
}

/// Run one command and return what it prints.
pub async fn execute(command: &Command, ledger: &mut ItemLedger) -> Result<Value> {
    match command {
        Command::List => {
            ledger.fetch_items().await;
            ensure_no_error(ledger, "failed to fetch items")?;
            Ok(serde_json::to_value(ledger.items())?)
        }

        Command::Show { id } => {
            ledger.fetch_item(*id).await;
            ensure_no_error(ledger, "failed to fetch item")?;
            Ok(json!({ "id": id, "form": ledger.form() }))
        }

        Command::Add {
            name,
            buy_date,
            period,
        } => {
            ledger.reset_form();
            let form = ledger.form_mut();
            form.name = name.clone();
            form.buy_date = buy_date.clone();
            form.warranty_period = *period;
            submit(ledger).await
        }

        Command::Edit {
            id,
            name,
            buy_date,
            period,
        } => {
            ledger.fetch_item(*id).await;
            ensure_no_error(ledger, "failed to fetch item")?;

            let form = ledger.form_mut();
            if let Some(name) = name {
                form.name = name.clone();
            }
            if let Some(buy_date) = buy_date {
                form.buy_date = buy_date.clone();
            }
            if let Some(period) = period {
                form.warranty_period = *period;
            }
            submit(ledger).await
        }

        Command::Expiring { today } => {
            ledger.fetch_items().await;
            ensure_no_error(ledger, "failed to fetch items")?;
            let items = match today {
                Some(day) => ledger.expiring_items(*day),
                None => ledger.expiring_today(),
            };
            Ok(serde_json::to_value(items)?)
        }
    }
}

fn ensure_no_error(ledger: &ItemLedger, what: &str) -> Result<()> {
    match ledger.error() {
        Some(message) => bail!("{}: {}", what, message),
        None => Ok(()),
    }
}

async fn submit(ledger: &mut ItemLedger) -> Result<Value> {
    if ledger.submit_form().await {
        let saved = ledger
            .last_saved()
            .ok_or_else(|| anyhow!("remote returned no item"))?;
        return Ok(serde_json::to_value(saved)?);
    }

    if !ledger.form_errors().is_empty() {
        let details: Vec<String> = ledger
            .form_errors()
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        bail!("invalid item: {}", details.join("; "));
    }

    bail!(
        "failed to save item: {}",
        ledger.error().unwrap_or("unknown error")
    )
}
