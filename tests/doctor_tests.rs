// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dpsbook::commands::doctor;
use dpsbook::{cli, commands, db};
use rusqlite::{Connection, params};

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

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    run(&mut conn, &["goal", "add", "--name", "Car", "--monthly", "1000", "--years", "1", "--rate", "6"]);
    run(&mut conn, &["deposit", "add", "--goal", "Car", "--amount", "1000", "--date", "2025-01-01"]);
    run(&mut conn, &["deposit", "add", "--goal", "Car", "--amount", "1000", "--date", "2025-02-01"]);
    run(
        &mut conn,
        &["tx", "add", "--type", "expense", "--category", "DPS", "--amount", "50", "--description", "bank fee"],
    );
    conn
}

fn kinds(conn: &Connection) -> Vec<String> {
    doctor::check(conn).unwrap().into_iter().map(|(k, _)| k).collect()
}

fn first_mirror(conn: &Connection) -> String {
    db::load_book(conn).unwrap().records()[0].transaction_id.clone().unwrap()
}

#[test]
fn healthy_book_has_no_issues() {
    let conn = setup();
    assert!(doctor::check(&conn).unwrap().is_empty());
    doctor::handle(&conn).unwrap();
}

#[test]
fn detects_drifted_goal_total() {
    let conn = setup();
    conn.execute("UPDATE goals SET current_amount='999'", []).unwrap();
    assert_eq!(kinds(&conn), vec!["aggregate_drift"]);
}

#[test]
fn detects_missing_and_mismatched_mirrors() {
    let conn = setup();
    let tx_id = first_mirror(&conn);
    conn.execute("UPDATE transactions SET amount='10' WHERE id=?1", params![tx_id])
        .unwrap();
    assert_eq!(kinds(&conn), vec!["mirror_mismatch"]);

    conn.execute("DELETE FROM transactions WHERE id=?1", params![tx_id]).unwrap();
    assert_eq!(kinds(&conn), vec!["mirror_missing"]);
}

#[test]
fn detects_orphans_and_stray_mirrors() {
    let conn = setup();
    conn.execute("DELETE FROM goals", []).unwrap();
    conn.execute(
        "INSERT INTO transactions(id, kind, category, amount, date, description)
         VALUES ('stray1', 'expense', 'DPS', '500', '2025-03-01', 'Savings Deposit: Old (Monthly)')",
        [],
    )
    .unwrap();
    let found = kinds(&conn);
    assert_eq!(found.iter().filter(|k| *k == "orphaned_record").count(), 2);
    assert_eq!(found.iter().filter(|k| *k == "stray_mirror").count(), 1);
    assert!(!found.contains(&"aggregate_drift".to_string()));
}
