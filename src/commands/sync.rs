// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::sync::{Snapshot, pull, push};
use anyhow::Result;
use rusqlite::Connection;

fn counts(snap: &Snapshot) -> String {
    format!(
        "{} goal(s), {} deposit(s), {} transaction(s)",
        snap.goals.len(),
        snap.records.len(),
        snap.transactions.len()
    )
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("push", _)) => {
            let snap = push(conn)?;
            println!("Pushed {}", counts(&snap));
        }
        Some(("pull", _)) => {
            let snap = pull(conn)?;
            println!("Pulled {} (snapshot from {})", counts(&snap), snap.updated_at);
        }
        _ => {}
    }
    Ok(())
}
