// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dpsbook::commands::reports::{monthly_flows, summary_report};
use dpsbook::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn run(conn: &mut Connection, args: &[&str]) {
    let mut argv = vec!["dpsbook"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("goal", sub)) => commands::goals::handle(conn, sub).unwrap(),
        Some(("deposit", sub)) => commands::deposits::handle(conn, sub).unwrap(),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub).unwrap(),
        Some(("report", sub)) => commands::reports::handle(conn, sub).unwrap(),
        _ => panic!("unexpected subcommand"),
    }
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    run(&mut conn, &["goal", "add", "--name", "Car", "--monthly", "1000", "--years", "1", "--rate", "12"]);
    run(&mut conn, &["deposit", "add", "--goal", "Car", "--amount", "1000", "--date", "2025-01-10"]);
    run(&mut conn, &["deposit", "add", "--goal", "Car", "--amount", "1000", "--date", "2025-02-10"]);
    run(
        &mut conn,
        &["tx", "add", "--type", "income", "--category", "Salary", "--amount", "50000", "--date", "2025-01-01"],
    );
    run(
        &mut conn,
        &["tx", "add", "--type", "income", "--category", "Salary", "--amount", "50000", "--date", "2025-02-01"],
    );
    conn
}

#[test]
fn summary_totals_and_per_goal_profit() {
    let mut conn = setup();
    let report = summary_report(&conn).unwrap();
    assert_eq!(report.totals.net_savings, Decimal::from(2000));
    assert_eq!(report.totals.accrued_profit, Decimal::from(30));
    assert_eq!(report.totals.wealth_portfolio, Decimal::from(2030));
    assert_eq!(report.goals.len(), 1);
    assert_eq!(report.goals[0].deposited, Decimal::from(2000));
    assert_eq!(report.goals[0].accrued_profit, Decimal::from(30));
    assert_eq!(report.goals[0].target, Decimal::from(12000));
    run(&mut conn, &["report", "summary"]);
}

#[test]
fn monthly_counts_mirrored_deposits_as_expense() {
    let mut conn = setup();
    let flows = monthly_flows(&conn, None, 12).unwrap();
    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].month, "2025-02");
    assert_eq!(flows[0].income, Decimal::from(50000));
    assert_eq!(flows[0].expense, Decimal::from(1000));
    assert_eq!(flows[0].net, Decimal::from(49000));

    assert_eq!(monthly_flows(&conn, None, 1).unwrap().len(), 1);
    let jan = monthly_flows(&conn, Some("2025-01"), 12).unwrap();
    assert_eq!(jan.len(), 1);
    assert_eq!(jan[0].month, "2025-01");
    run(&mut conn, &["report", "monthly", "--months", "6", "--json"]);
}
