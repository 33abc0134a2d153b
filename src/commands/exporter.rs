// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::deposits;
use crate::ledger::{LedgerFilter, list_transactions};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("savings", sub)) => export_savings(conn, sub),
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn format_arg(sub: &clap::ArgMatches) -> Result<String> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    Ok(fmt)
}

fn export_savings(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = format_arg(sub)?;
    let out = sub.get_one::<String>("out").unwrap();
    let rows = deposits::query_rows(conn, None, None)?;

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "id",
            "date",
            "goal",
            "amount",
            "step_profit",
            "running_balance",
            "note",
            "transaction_id",
        ])?;
        for r in rows {
            wtr.write_record([
                r.id,
                r.date,
                r.goal,
                r.amount.to_string(),
                r.step_profit.to_string(),
                r.running_balance.to_string(),
                r.note,
                r.transaction_id.unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
    }
    println!("Exported savings history to {}", out);
    Ok(())
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = format_arg(sub)?;
    let out = sub.get_one::<String>("out").unwrap();
    let mut rows = list_transactions(conn, &LedgerFilter::default())?;
    rows.reverse();

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["id", "date", "type", "category", "amount", "description"])?;
        for t in rows {
            wtr.write_record([
                t.id,
                t.date.to_string(),
                t.kind.as_str().to_string(),
                t.category,
                t.amount.to_string(),
                t.description,
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .iter()
            .map(|t| {
                json!({
                    "id": t.id, "date": t.date.to_string(), "type": t.kind.as_str(),
                    "category": t.category, "amount": t.amount.to_string(), "description": t.description
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
