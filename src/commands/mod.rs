// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod deposits;
pub mod doctor;
pub mod exporter;
pub mod goals;
pub mod importer;
pub mod reports;
pub mod sync;
pub mod transactions;

use crate::book::SavingsBook;
use crate::db::{load_book, save_book};
use crate::ledger::SqliteLedger;
use anyhow::{Context, Result};
use rusqlite::Connection;

/// Loads the book, runs `f` against it with a ledger on the same database
/// transaction, then saves and commits. Nothing is written if `f` fails.
pub fn with_book<T>(
    conn: &mut Connection,
    f: impl FnOnce(&mut SavingsBook, &mut SqliteLedger<'_>) -> Result<T>,
) -> Result<T> {
    let tx = conn.transaction()?;
    let mut book = load_book(&tx)?;
    let mut ledger = SqliteLedger::new(&tx);
    let out = f(&mut book, &mut ledger)?;
    save_book(&tx, &book)?;
    tx.commit()?;
    Ok(out)
}

/// Goal id for a name (case-insensitive) or id.
pub fn goal_id_for(book: &SavingsBook, name: &str) -> Result<String> {
    book.goal_by_name(name)
        .map(|g| g.id.clone())
        .with_context(|| format!("Goal '{}' not found", name.trim()))
}
