// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dpsbook::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["dpsbook"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("goal", sub)) => commands::goals::handle(conn, sub),
        Some(("deposit", sub)) => commands::deposits::handle(conn, sub),
        Some(("export", sub)) => commands::exporter::handle(conn, sub),
        _ => panic!("unexpected subcommand"),
    }
}

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    run(
        &mut conn,
        &["goal", "add", "--name", "Car", "--monthly", "1000", "--years", "1", "--rate", "12", "--start", "2025-01-01"],
    )
    .unwrap();
    for (amount, date) in [("1000", "2025-01-01"), ("1000", "2025-02-01")] {
        run(&mut conn, &["deposit", "add", "--goal", "Car", "--amount", amount, "--date", date]).unwrap();
    }
    conn
}

fn dec(v: &serde_json::Value) -> Decimal {
    serde_json::from_value(v.clone()).unwrap()
}

#[test]
fn export_savings_as_json_is_newest_first() {
    let mut conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("savings.json");
    let out_str = out_path.to_string_lossy().to_string();
    run(&mut conn, &["export", "savings", "--format", "json", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2025-02-01");
    assert_eq!(rows[0]["goal"], "Car");
    assert_eq!(dec(&rows[0]["step_profit"]), Decimal::from(20));
    assert_eq!(dec(&rows[0]["running_balance"]), Decimal::from(2030));
    assert_eq!(rows[1]["date"], "2025-01-01");
    assert_eq!(dec(&rows[1]["running_balance"]), Decimal::from(1010));
    assert!(rows[1]["transaction_id"].is_string());
}

#[test]
fn export_transactions_as_csv() {
    let mut conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("tx.csv");
    let out_str = out_path.to_string_lossy().to_string();
    run(&mut conn, &["export", "transactions", "--format", "CSV", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "type", "category", "amount", "description"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "2025-01-01");
    assert_eq!(&records[0][2], "expense");
    assert_eq!(&records[0][3], "DPS");
    assert_eq!(&records[0][5], "Savings Deposit: Car (Monthly)");
}

#[test]
fn export_rejects_unknown_format() {
    let mut conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();
    assert!(run(&mut conn, &["export", "savings", "--format", "xml", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}
