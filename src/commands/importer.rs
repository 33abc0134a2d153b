// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{goal_id_for, with_book};
use crate::db::load_book;
use crate::engine::bulk::{BulkParse, MAX_BULK_LINES, parse_bulk_input};
use crate::utils::pretty_table;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::io::Read;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("deposits", sub)) => import_deposits(conn, sub),
        _ => Ok(()),
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Read deposits from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Open {}", path))
}

fn print_preview(parsed: &BulkParse) {
    let rows = parsed
        .candidates
        .iter()
        .map(|c| vec![c.date.to_string(), c.amount.to_string(), c.note.clone()])
        .collect();
    println!("{}", pretty_table(&["Date", "Amount", "Note"], rows));
}

fn skipped_summary(parsed: &BulkParse) -> String {
    let mut parts = Vec::new();
    if parsed.dropped > 0 {
        parts.push(format!("{} unreadable line(s) skipped", parsed.dropped));
    }
    if parsed.truncated > 0 {
        parts.push(format!(
            "{} line(s) past the first {} ignored",
            parsed.truncated, MAX_BULK_LINES
        ));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn import_deposits(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let goal = sub.get_one::<String>("goal").unwrap();
    let text = read_input(path)?;
    let parsed = parse_bulk_input(&text);
    info!(
        accepted = parsed.candidates.len(),
        dropped = parsed.dropped,
        truncated = parsed.truncated,
        "parsed bulk deposits"
    );
    if parsed.candidates.is_empty() {
        bail!("No valid deposit lines found in {}{}", path, skipped_summary(&parsed));
    }

    if sub.get_flag("dry_run") {
        goal_id_for(&load_book(conn)?, goal)?;
        print_preview(&parsed);
        println!(
            "{} deposit(s) ready to import{}",
            parsed.candidates.len(),
            skipped_summary(&parsed)
        );
        return Ok(());
    }

    let ids = with_book(conn, |book, ledger| {
        let goal_id = goal_id_for(book, goal)?;
        Ok(book.import_records(&goal_id, &parsed.candidates, ledger)?)
    })?;
    println!(
        "Imported {} deposit(s) into '{}'{}",
        ids.len(),
        goal.trim(),
        skipped_summary(&parsed)
    );
    Ok(())
}
