// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{goal_id_for, with_book};
use crate::book::RecordDraft;
use crate::db::load_book;
use crate::engine::replay::filter_goal;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub const MISSING_GOAL_LABEL: &str = "(deleted goal)";

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let goal = sub.get_one::<String>("goal").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let id = with_book(conn, |book, ledger| {
        let goal_id = goal_id_for(book, goal)?;
        Ok(book.create_record(
            RecordDraft {
                goal_id,
                amount,
                date,
                note,
            },
            ledger,
        )?)
    })?;
    println!("Recorded deposit {} of {} on {} to '{}'", id, amount, date, goal.trim());
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("id").unwrap();
    let goal = sub.get_one::<String>("goal");
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let date = sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?;
    let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());

    let id = with_book(conn, |book, ledger| {
        let current = book.resolve_record(key)?.clone();
        let goal_id = match goal {
            Some(g) => goal_id_for(book, g)?,
            None => current.goal_id.clone(),
        };
        let draft = RecordDraft {
            goal_id,
            amount: amount.unwrap_or(current.amount),
            date: date.unwrap_or(current.date),
            note: note.unwrap_or(current.note),
        };
        book.edit_record(&current.id, draft, ledger)?;
        Ok(current.id)
    })?;
    println!("Updated deposit {}", id);
    Ok(())
}

fn remove(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("id").unwrap();
    let removed = with_book(conn, |book, ledger| {
        let id = book.resolve_record(key)?.id.clone();
        Ok(book.delete_record(&id, ledger)?)
    })?;
    println!(
        "Removed deposit {} ({} on {})",
        removed.id, removed.amount, removed.date
    );
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub date: String,
    pub goal: String,
    pub amount: Decimal,
    pub step_profit: Decimal,
    pub running_balance: Decimal,
    pub note: String,
    pub transaction_id: Option<String>,
}

/// Replayed deposit history, newest first, optionally narrowed to one goal.
pub fn query_rows(conn: &Connection, goal: Option<&str>, limit: Option<usize>) -> Result<Vec<HistoryRow>> {
    let book = load_book(conn)?;
    let goal_id = goal
        .map(|g| {
            book.goal_by_name(g)
                .map(|g| g.id.clone())
                .with_context(|| format!("Goal '{}' not found", g.trim()))
        })
        .transpose()?;
    let history = book.history();
    let rows = filter_goal(&history, goal_id.as_deref())
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|h| HistoryRow {
            id: h.record.id.clone(),
            date: h.record.date.to_string(),
            goal: book
                .goal(&h.record.goal_id)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| MISSING_GOAL_LABEL.to_string()),
            amount: h.record.amount,
            step_profit: h.step_profit,
            running_balance: h.running_balance,
            note: h.record.note.clone(),
            transaction_id: h.record.transaction_id.clone(),
        })
        .collect();
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let goal = sub.get_one::<String>("goal").map(|s| s.as_str());
    let limit = sub.get_one::<usize>("limit").copied();
    let data = query_rows(conn, goal, limit)?;
    if maybe_print_json(sub, &data)? {
        return Ok(());
    }
    let rows = data
        .into_iter()
        .map(|r| {
            vec![
                r.id,
                r.date,
                r.goal,
                r.amount.to_string(),
                r.step_profit.to_string(),
                r.running_balance.to_string(),
                r.note,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Goal", "Deposit", "Profit (Est.)", "Balance", "Note"],
            rows
        )
    );
    Ok(())
}
