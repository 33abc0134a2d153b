// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The general income/expense ledger and the bridge savings records use to
//! mirror deposits into it.

use crate::error::LedgerError;
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::utils::{new_id, parse_decimal};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

/// Write access to the general ledger. Ids returned by `add_transaction` must
/// stay valid for later edits and deletes.
pub trait TransactionBridge {
    fn add_transaction(&mut self, entry: NewTransaction) -> Result<String, LedgerError>;
    fn edit_transaction(&mut self, entry: &Transaction) -> Result<(), LedgerError>;
    fn delete_transaction(&mut self, id: &str) -> Result<(), LedgerError>;
}

/// Ledger kept in memory; used for dry runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    pub transactions: Vec<Transaction>,
}

impl MemoryLedger {
    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }
}

impl TransactionBridge for MemoryLedger {
    fn add_transaction(&mut self, entry: NewTransaction) -> Result<String, LedgerError> {
        let id = new_id();
        self.transactions.push(entry.with_id(id.clone()));
        Ok(id)
    }

    fn edit_transaction(&mut self, entry: &Transaction) -> Result<(), LedgerError> {
        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == entry.id)
            .ok_or_else(|| LedgerError::NotFound(entry.id.clone()))?;
        *slot = entry.clone();
        Ok(())
    }

    fn delete_transaction(&mut self, id: &str) -> Result<(), LedgerError> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        if self.transactions.len() == before {
            return Err(LedgerError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Ledger backed by the `transactions` table. Borrow it from an open
/// `rusqlite::Transaction` so mirrored writes commit with the savings book.
pub struct SqliteLedger<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, id: &str) -> Result<Option<Transaction>> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, kind, category, amount, date, description FROM transactions WHERE id=?1",
                params![id],
                raw_row,
            )
            .optional()?;
        raw.map(RawTransaction::decode).transpose()
    }
}

impl TransactionBridge for SqliteLedger<'_> {
    fn add_transaction(&mut self, entry: NewTransaction) -> Result<String, LedgerError> {
        let id = new_id();
        self.conn.execute(
            "INSERT INTO transactions(id, kind, category, amount, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                entry.kind.as_str(),
                entry.category,
                entry.amount.to_string(),
                entry.date,
                entry.description
            ],
        )?;
        Ok(id)
    }

    fn edit_transaction(&mut self, entry: &Transaction) -> Result<(), LedgerError> {
        let n = self.conn.execute(
            "UPDATE transactions SET kind=?2, category=?3, amount=?4, date=?5, description=?6 WHERE id=?1",
            params![
                entry.id,
                entry.kind.as_str(),
                entry.category,
                entry.amount.to_string(),
                entry.date,
                entry.description
            ],
        )?;
        if n == 0 {
            return Err(LedgerError::NotFound(entry.id.clone()));
        }
        Ok(())
    }

    fn delete_transaction(&mut self, id: &str) -> Result<(), LedgerError> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(LedgerError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct LedgerFilter {
    pub month: Option<String>, // YYYY-MM
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

struct RawTransaction {
    id: String,
    kind: String,
    category: String,
    amount: String,
    date: NaiveDate,
    description: String,
}

impl RawTransaction {
    fn decode(self) -> Result<Transaction> {
        let kind = self
            .kind
            .parse::<TransactionKind>()
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("Transaction {}", self.id))?;
        let amount = parse_decimal(&self.amount)
            .with_context(|| format!("Invalid amount in transaction {}", self.id))?;
        Ok(Transaction {
            id: self.id,
            kind,
            category: self.category,
            amount,
            date: self.date,
            description: self.description,
        })
    }
}

fn raw_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok(RawTransaction {
        id: r.get(0)?,
        kind: r.get(1)?,
        category: r.get(2)?,
        amount: r.get(3)?,
        date: r.get(4)?,
        description: r.get(5)?,
    })
}

/// Newest first.
pub fn list_transactions(conn: &Connection, filter: &LedgerFilter) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, kind, category, amount, date, description FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = &filter.month {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.clone());
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().to_string());
    }
    if let Some(cat) = &filter.category {
        sql.push_str(" AND category=?");
        params_vec.push(cat.clone());
    }
    sql.push_str(" ORDER BY date DESC, created_at DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), raw_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.decode()?);
    }
    Ok(out)
}
