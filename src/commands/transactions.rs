// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{LedgerFilter, SqliteLedger, TransactionBridge, list_transactions};
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table, today};
use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<TransactionKind> {
    s.parse::<TransactionKind>().map_err(|e| anyhow!(e))
}

/// Savings record that mirrors this transaction, if any.
pub fn linked_record(conn: &Connection, transaction_id: &str) -> Result<Option<String>> {
    let id = conn
        .query_row(
            "SELECT id FROM records WHERE transaction_id=?1",
            params![transaction_id],
            |r| r.get::<_, String>(0),
        )
        .optional()?;
    Ok(id)
}

fn ensure_unlinked(conn: &Connection, id: &str, action: &str) -> Result<()> {
    if let Some(record) = linked_record(conn, id)? {
        bail!(
            "Transaction {} mirrors savings deposit {}; use `dpsbook deposit {}` instead",
            id,
            record,
            action
        );
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let entry = NewTransaction {
        kind: parse_kind(sub.get_one::<String>("type").unwrap())?,
        category: sub.get_one::<String>("category").unwrap().trim().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        date: match sub.get_one::<String>("date") {
            Some(s) => parse_date(s)?,
            None => today(),
        },
        description: sub
            .get_one::<String>("description")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    };
    let (kind, amount, date, category) = (entry.kind, entry.amount, entry.date, entry.category.clone());
    let id = SqliteLedger::new(conn).add_transaction(entry)?;
    println!(
        "Recorded {} {} on {} in '{}' [{}]",
        kind.as_str(),
        amount,
        date,
        category,
        id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    ensure_unlinked(conn, id, "edit")?;
    let mut ledger = SqliteLedger::new(conn);
    let current = ledger
        .get(id)?
        .with_context(|| format!("Transaction {} not found", id))?;
    let updated = Transaction {
        id: current.id.clone(),
        kind: match sub.get_one::<String>("type") {
            Some(s) => parse_kind(s)?,
            None => current.kind,
        },
        category: sub
            .get_one::<String>("category")
            .map(|s| s.trim().to_string())
            .unwrap_or(current.category),
        amount: match sub.get_one::<String>("amount") {
            Some(s) => parse_decimal(s)?,
            None => current.amount,
        },
        date: match sub.get_one::<String>("date") {
            Some(s) => parse_date(s)?,
            None => current.date,
        },
        description: sub
            .get_one::<String>("description")
            .map(|s| s.trim().to_string())
            .unwrap_or(current.description),
    };
    ledger.edit_transaction(&updated)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    ensure_unlinked(conn, id, "rm")?;
    SqliteLedger::new(conn).delete_transaction(id)?;
    println!("Removed transaction {}", id);
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = LedgerFilter {
        month: sub.get_one::<String>("month").map(|m| parse_month(m)).transpose()?,
        kind: sub.get_one::<String>("type").map(|s| parse_kind(s)).transpose()?,
        category: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    list_transactions(conn, &filter)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub, &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|t| {
                vec![
                    t.id,
                    t.date.to_string(),
                    t.kind.as_str().to_string(),
                    t.category,
                    t.amount.to_string(),
                    t.description,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Type", "Category", "Amount", "Description"], rows)
        );
    }
    Ok(())
}
