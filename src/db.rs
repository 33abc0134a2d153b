// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::SavingsBook;
use crate::config::Settings;
use crate::models::{SavingsGoal, SavingsRecord};
use crate::utils::parse_decimal;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Dpsbook", "dpsbook"));

pub const DB_ENV: &str = "DPSBOOK_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("dpsbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn = Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS goals(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        monthly_deposit TEXT NOT NULL,
        years TEXT NOT NULL,
        profit_percent TEXT NOT NULL,
        target_amount TEXT NOT NULL,
        maturity_value TEXT NOT NULL,
        current_amount TEXT NOT NULL DEFAULT '0',
        start_date TEXT NOT NULL,
        maturity_date TEXT NOT NULL,
        color TEXT NOT NULL,
        position INTEGER NOT NULL
    );

    -- no foreign key on goal_id: records may outlive their goal
    CREATE TABLE IF NOT EXISTS records(
        id TEXT PRIMARY KEY,
        goal_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        transaction_id TEXT,
        position INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_records_goal ON records(goal_id);

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    "#,
    )?;
    Ok(())
}

/// Loads goals and records in their stored order, with the configured
/// mirror category applied.
pub fn load_book(conn: &Connection) -> Result<SavingsBook> {
    let settings = Settings::load(conn)?;
    let goals = load_goals(conn)?;
    let records = load_records(conn)?;
    Ok(SavingsBook::from_parts(goals, records).with_mirror_category(settings.mirror_category))
}

/// Replaces the stored goals and records with the book's. Run it inside the
/// same rusqlite transaction as any mirrored ledger writes.
pub fn save_book(conn: &Connection, book: &SavingsBook) -> Result<()> {
    conn.execute("DELETE FROM records", [])?;
    conn.execute("DELETE FROM goals", [])?;
    {
        let mut stmt = conn.prepare(
            "INSERT INTO goals(id, name, monthly_deposit, years, profit_percent, target_amount,
                maturity_value, current_amount, start_date, maturity_date, color, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )?;
        for (pos, g) in book.goals().iter().enumerate() {
            stmt.execute(params![
                g.id,
                g.name,
                g.monthly_deposit.to_string(),
                g.years.to_string(),
                g.profit_percent.to_string(),
                g.target_amount.to_string(),
                g.maturity_value.to_string(),
                g.current_amount.to_string(),
                g.start_date,
                g.maturity_date,
                g.color,
                pos as i64
            ])?;
        }
    }
    let mut stmt = conn.prepare(
        "INSERT INTO records(id, goal_id, amount, date, note, transaction_id, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (pos, r) in book.records().iter().enumerate() {
        stmt.execute(params![
            r.id,
            r.goal_id,
            r.amount.to_string(),
            r.date,
            r.note,
            r.transaction_id,
            pos as i64
        ])?;
    }
    debug!(goals = book.goals().len(), records = book.records().len(), "saved savings book");
    Ok(())
}

fn load_goals(conn: &Connection) -> Result<Vec<SavingsGoal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, monthly_deposit, years, profit_percent, target_amount, maturity_value,
                current_amount, start_date, maturity_date, color
         FROM goals ORDER BY position, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            [
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, String>(5)?,
                r.get::<_, String>(6)?,
                r.get::<_, String>(7)?,
            ],
            r.get::<_, NaiveDate>(8)?,
            r.get::<_, NaiveDate>(9)?,
            r.get::<_, String>(10)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, nums, start_date, maturity_date, color) = row?;
        let dec = |i: usize| {
            parse_decimal(&nums[i]).with_context(|| format!("Invalid number stored for goal '{}'", name))
        };
        out.push(SavingsGoal {
            monthly_deposit: dec(0)?,
            years: dec(1)?,
            profit_percent: dec(2)?,
            target_amount: dec(3)?,
            maturity_value: dec(4)?,
            current_amount: dec(5)?,
            id,
            name,
            start_date,
            maturity_date,
            color,
        });
    }
    Ok(out)
}

fn load_records(conn: &Connection) -> Result<Vec<SavingsRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, goal_id, amount, date, note, transaction_id FROM records ORDER BY position, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, NaiveDate>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, goal_id, amount, date, note, transaction_id) = row?;
        let amount = parse_decimal(&amount)
            .with_context(|| format!("Invalid amount '{}' in record {}", amount, id))?;
        out.push(SavingsRecord {
            id,
            goal_id,
            amount,
            date,
            note,
            transaction_id,
        });
    }
    Ok(out)
}
