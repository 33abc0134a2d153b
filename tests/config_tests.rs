// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dpsbook::config::{self, Settings};
use dpsbook::{cli, commands, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn defaults_apply_until_set() {
    let conn = setup();
    let s = Settings::load(&conn).unwrap();
    assert_eq!(s.currency, "BDT");
    assert_eq!(s.mirror_category, "DPS");
    assert!(s.sync_url.is_none());

    config::set(&conn, "currency", " USD ").unwrap();
    assert_eq!(config::get(&conn, "currency").unwrap().as_deref(), Some("USD"));
}

#[test]
fn unknown_keys_and_empty_category_are_rejected() {
    let conn = setup();
    assert!(config::set(&conn, "colour", "red").is_err());
    assert!(config::get(&conn, "colour").is_err());
    assert!(config::set(&conn, "mirror_category", "  ").is_err());
}

#[test]
fn token_is_masked() {
    let conn = setup();
    config::set(&conn, "sync_token", "s3cret").unwrap();
    assert_eq!(config::get(&conn, "sync_token").unwrap().as_deref(), Some("********"));
    assert_eq!(Settings::load(&conn).unwrap().sync_token.as_deref(), Some("s3cret"));
}

#[test]
fn mirror_category_flows_into_new_deposits() {
    let mut conn = setup();
    let matches = cli::build_cli().get_matches_from(["dpsbook", "config", "set", "mirror_category", "Savings"]);
    let Some(("config", sub)) = matches.subcommand() else {
        panic!("no config subcommand");
    };
    commands::config::handle(&conn, sub).unwrap();

    for args in [
        vec!["dpsbook", "goal", "add", "--name", "Car", "--monthly", "100", "--years", "1", "--rate", "5"],
        vec!["dpsbook", "deposit", "add", "--goal", "Car", "--amount", "100"],
    ] {
        let matches = cli::build_cli().get_matches_from(args);
        match matches.subcommand() {
            Some(("goal", sub)) => commands::goals::handle(&mut conn, sub).unwrap(),
            Some(("deposit", sub)) => commands::deposits::handle(&mut conn, sub).unwrap(),
            _ => panic!("unexpected subcommand"),
        }
    }
    let book = db::load_book(&conn).unwrap();
    assert_eq!(book.mirror_category(), "Savings");
    let snap = dpsbook::sync::build_snapshot(&conn).unwrap();
    assert_eq!(snap.transactions[0].category, "Savings");
}

#[test]
fn goal_edit_summary_uses_configured_currency() {
    let mut conn = setup();
    config::set(&conn, "currency", "USD").unwrap();
    for args in [
        vec!["dpsbook", "goal", "add", "--name", "Car", "--monthly", "100", "--years", "1", "--rate", "0"],
        vec!["dpsbook", "goal", "edit", "--goal", "Car", "--monthly", "250"],
    ] {
        let matches = cli::build_cli().get_matches_from(args);
        let Some(("goal", sub)) = matches.subcommand() else {
            panic!("no goal subcommand");
        };
        commands::goals::handle(&mut conn, sub).unwrap();
    }
    let book = db::load_book(&conn).unwrap();
    let goal = book.goal_by_name("Car").unwrap();
    let ccy = Settings::load(&conn).unwrap().currency;
    let line = commands::goals::edit_summary(goal, &ccy);
    assert!(line.contains("target USD 3000"), "{}", line);
    assert!(line.contains("maturity USD 3000 on"), "{}", line);
}
