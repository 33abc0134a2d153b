// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dpsbook::sync::{SNAPSHOT_VERSION, Snapshot, apply_snapshot, build_snapshot};
use dpsbook::{cli, commands, db};
use rusqlite::Connection;

fn run(conn: &mut Connection, args: &[&str]) {
    let mut argv = vec!["dpsbook"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("goal", sub)) => commands::goals::handle(conn, sub).unwrap(),
        Some(("deposit", sub)) => commands::deposits::handle(conn, sub).unwrap(),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub).unwrap(),
        _ => panic!("unexpected subcommand"),
    }
}

fn fresh() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn populated() -> Connection {
    let mut conn = fresh();
    run(&mut conn, &["goal", "add", "--name", "Car", "--monthly", "5000", "--years", "2.5", "--rate", "9.4"]);
    run(&mut conn, &["goal", "add", "--name", "House", "--monthly", "2000", "--years", "5", "--rate", "7"]);
    run(&mut conn, &["deposit", "add", "--goal", "Car", "--amount", "5000", "--date", "2025-01-05"]);
    run(&mut conn, &["deposit", "add", "--goal", "House", "--amount", "2000", "--date", "2025-01-06", "--note", "first"]);
    run(
        &mut conn,
        &["tx", "add", "--type", "income", "--category", "Salary", "--amount", "80000", "--date", "2025-01-01"],
    );
    conn
}

fn sorted(mut snap: Snapshot) -> Snapshot {
    snap.transactions.sort_by(|a, b| a.id.cmp(&b.id));
    snap.updated_at.clear();
    snap
}

#[test]
fn snapshot_survives_a_json_round_trip() {
    let source = populated();
    let snap = build_snapshot(&source).unwrap();
    assert_eq!(snap.version, SNAPSHOT_VERSION);
    assert_eq!(snap.goals.len(), 2);
    assert_eq!(snap.records.len(), 2);
    assert_eq!(snap.transactions.len(), 3);

    let wire = serde_json::to_string(&snap).unwrap();
    let decoded: Snapshot = serde_json::from_str(&wire).unwrap();

    let mut target = fresh();
    apply_snapshot(&mut target, &decoded).unwrap();
    assert_eq!(sorted(build_snapshot(&target).unwrap()), sorted(snap));
}

#[test]
fn apply_replaces_existing_state() {
    let mut target = populated();
    let mut other = fresh();
    run(&mut other, &["goal", "add", "--name", "Trip", "--monthly", "100", "--years", "1", "--rate", "0"]);
    let snap = build_snapshot(&other).unwrap();

    apply_snapshot(&mut target, &snap).unwrap();
    let book = db::load_book(&target).unwrap();
    assert_eq!(book.goals().len(), 1);
    assert_eq!(book.goals()[0].name, "Trip");
    assert!(book.records().is_empty());
    assert!(build_snapshot(&target).unwrap().transactions.is_empty());
}

#[test]
fn newer_snapshot_versions_are_refused() {
    let mut target = populated();
    let mut snap = build_snapshot(&fresh()).unwrap();
    snap.version = SNAPSHOT_VERSION + 1;
    assert!(apply_snapshot(&mut target, &snap).is_err());
    assert_eq!(db::load_book(&target).unwrap().goals().len(), 2);
}

#[test]
fn push_without_endpoint_fails_before_network() {
    let conn = populated();
    let err = dpsbook::sync::push(&conn).unwrap_err();
    assert!(err.to_string().contains("sync_url"));
}
