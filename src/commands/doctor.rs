// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::MIRROR_DESCRIPTION_PREFIX;
use crate::db::load_book;
use crate::ledger::{LedgerFilter, SqliteLedger, list_transactions};
use crate::models::TransactionKind;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;

/// Consistency problems as `(issue, detail)` pairs; empty when healthy.
pub fn check(conn: &Connection) -> Result<Vec<(String, String)>> {
    let book = load_book(conn)?;
    let ledger = SqliteLedger::new(conn);
    let mut issues = Vec::new();

    // 1) Cached goal totals that no longer match their deposits
    for (goal_id, cached, actual) in book.aggregate_drift() {
        let name = book.goal(&goal_id).map(|g| g.name.as_str()).unwrap_or("?");
        issues.push((
            "aggregate_drift".to_string(),
            format!("{} cached {} but deposits sum to {}", name, cached, actual),
        ));
    }

    // 2) Deposits pointing at a goal that is gone
    for r in book.orphaned_records() {
        issues.push((
            "orphaned_record".to_string(),
            format!("{} ({} on {}) -> goal {}", r.id, r.amount, r.date, r.goal_id),
        ));
    }

    // 3) Mirrored transactions that are missing or out of step
    let mut linked = HashSet::new();
    for r in book.records() {
        let Some(tx_id) = &r.transaction_id else {
            continue;
        };
        linked.insert(tx_id.clone());
        match ledger.get(tx_id)? {
            None => issues.push((
                "mirror_missing".to_string(),
                format!("deposit {} -> transaction {}", r.id, tx_id),
            )),
            Some(t) => {
                let mut diffs = Vec::new();
                if t.amount != r.amount {
                    diffs.push(format!("amount {} != {}", t.amount, r.amount));
                }
                if t.date != r.date {
                    diffs.push(format!("date {} != {}", t.date, r.date));
                }
                if t.category != book.mirror_category() {
                    diffs.push(format!("category '{}'", t.category));
                }
                if !diffs.is_empty() {
                    issues.push((
                        "mirror_mismatch".to_string(),
                        format!("deposit {}: {}", r.id, diffs.join(", ")),
                    ));
                }
            }
        }
    }

    // 4) Mirror-looking transactions no deposit claims
    let filter = LedgerFilter {
        kind: Some(TransactionKind::Expense),
        category: Some(book.mirror_category().to_string()),
        ..LedgerFilter::default()
    };
    for t in list_transactions(conn, &filter)? {
        if t.description.starts_with(MIRROR_DESCRIPTION_PREFIX) && !linked.contains(&t.id) {
            issues.push((
                "stray_mirror".to_string(),
                format!("transaction {} ({} on {})", t.id, t.amount, t.date),
            ));
        }
    }

    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = check(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(k, v)| vec![k, v]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
