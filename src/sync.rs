// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Full-snapshot sync with a hosted backend. The whole local state is sent
//! on push and replaced wholesale on pull; the last writer wins.

use crate::book::SavingsBook;
use crate::config::Settings;
use crate::db::{load_book, save_book};
use crate::ledger::{LedgerFilter, list_transactions};
use crate::models::{SavingsGoal, SavingsRecord, Transaction};
use crate::utils::http_client;
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub updated_at: String,
    pub goals: Vec<SavingsGoal>,
    pub records: Vec<SavingsRecord>,
    pub transactions: Vec<Transaction>,
}

pub fn build_snapshot(conn: &Connection) -> Result<Snapshot> {
    let (goals, records) = load_book(conn)?.into_parts();
    let mut transactions = list_transactions(conn, &LedgerFilter::default())?;
    transactions.reverse();
    Ok(Snapshot {
        version: SNAPSHOT_VERSION,
        updated_at: chrono::Utc::now().to_rfc3339(),
        goals,
        records,
        transactions,
    })
}

/// Replaces all goals, records and transactions with the snapshot's.
pub fn apply_snapshot(conn: &mut Connection, snap: &Snapshot) -> Result<()> {
    if snap.version > SNAPSHOT_VERSION {
        bail!(
            "Snapshot version {} is newer than supported version {}",
            snap.version,
            SNAPSHOT_VERSION
        );
    }
    let tx = conn.transaction()?;
    let book = SavingsBook::from_parts(snap.goals.clone(), snap.records.clone());
    save_book(&tx, &book)?;
    tx.execute("DELETE FROM transactions", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions(id, kind, category, amount, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for t in &snap.transactions {
            stmt.execute(params![
                t.id,
                t.kind.as_str(),
                t.category,
                t.amount.to_string(),
                t.date,
                t.description
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn endpoint(settings: &Settings) -> Result<&str> {
    settings
        .sync_url
        .as_deref()
        .context("No sync_url configured; run `dpsbook config set sync_url <URL>`")
}

pub fn push(conn: &Connection) -> Result<Snapshot> {
    let settings = Settings::load(conn)?;
    let url = endpoint(&settings)?;
    let snap = build_snapshot(conn)?;
    let client = http_client()?;
    let mut req = client.put(url).json(&snap);
    if let Some(token) = &settings.sync_token {
        req = req.bearer_auth(token);
    }
    req.send()
        .with_context(|| format!("Push snapshot to {}", url))?
        .error_for_status()?;
    info!(url = %url, goals = snap.goals.len(), records = snap.records.len(), "pushed snapshot");
    Ok(snap)
}

pub fn pull(conn: &mut Connection) -> Result<Snapshot> {
    let settings = Settings::load(conn)?;
    let url = endpoint(&settings)?.to_string();
    let client = http_client()?;
    let mut req = client.get(&url);
    if let Some(token) = &settings.sync_token {
        req = req.bearer_auth(token);
    }
    let snap: Snapshot = req
        .send()
        .with_context(|| format!("Pull snapshot from {}", url))?
        .error_for_status()?
        .json()
        .context("Decode snapshot")?;
    apply_snapshot(conn, &snap)?;
    info!(url = %url, goals = snap.goals.len(), records = snap.records.len(), "pulled snapshot");
    Ok(snap)
}
