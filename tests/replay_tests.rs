// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dpsbook::engine::replay::{filter_goal, replay, summarize};
use dpsbook::models::{AnnotatedRecord, SavingsGoal, SavingsRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;

fn goal(id: &str, rate: i64) -> SavingsGoal {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    SavingsGoal {
        id: id.to_string(),
        name: id.to_uppercase(),
        monthly_deposit: Decimal::from(1000),
        years: Decimal::from(1),
        profit_percent: Decimal::from(rate),
        target_amount: Decimal::from(12000),
        maturity_value: Decimal::from(12500),
        current_amount: Decimal::ZERO,
        start_date: start,
        maturity_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        color: "#6366f1".to_string(),
    }
}

fn record(id: &str, goal_id: &str, amount: i64, date: &str) -> SavingsRecord {
    SavingsRecord {
        id: id.to_string(),
        goal_id: goal_id.to_string(),
        amount: Decimal::from(amount),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        note: String::new(),
        transaction_id: None,
    }
}

fn by_id(history: &[AnnotatedRecord]) -> HashMap<String, (Decimal, Decimal)> {
    history
        .iter()
        .map(|h| (h.record.id.clone(), (h.step_profit, h.running_balance)))
        .collect()
}

#[test]
fn compounds_in_date_order_and_lists_newest_first() {
    let goals = vec![goal("g1", 12)];
    // deliberately stored out of order
    let records = vec![
        record("r2", "g1", 1000, "2025-02-01"),
        record("r1", "g1", 1000, "2025-01-01"),
    ];
    let history = replay(&goals, &records);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].record.id, "r2");
    assert_eq!(history[1].record.id, "r1");

    assert_eq!(history[1].step_profit, Decimal::from(10));
    assert_eq!(history[1].running_balance, Decimal::from(1010));
    // 2010 * 1% = 20.1, carried unrounded into the balance
    assert_eq!(history[0].step_profit, Decimal::from(20));
    assert_eq!(history[0].running_balance, Decimal::from(2030));
}

#[test]
fn balances_are_tracked_per_goal() {
    let goals = vec![goal("a", 12), goal("b", 0)];
    let records = vec![
        record("r1", "a", 1000, "2025-01-01"),
        record("r2", "b", 500, "2025-01-02"),
        record("r3", "a", 1000, "2025-01-03"),
    ];
    let out = by_id(&replay(&goals, &records));
    assert_eq!(out["r2"], (Decimal::ZERO, Decimal::from(500)));
    assert_eq!(out["r3"], (Decimal::from(20), Decimal::from(2030)));
}

#[test]
fn replay_is_idempotent() {
    let goals = vec![goal("g1", 9)];
    let records = vec![
        record("r1", "g1", 5000, "2025-01-05"),
        record("r2", "g1", 5000, "2025-02-05"),
        record("r3", "g1", 5000, "2025-03-05"),
    ];
    assert_eq!(replay(&goals, &records), replay(&goals, &records));
}

#[test]
fn output_does_not_depend_on_input_order() {
    let goals = vec![goal("g1", 9), goal("g2", 6)];
    let records = vec![
        record("r1", "g1", 5000, "2025-01-05"),
        record("r2", "g1", 3000, "2025-01-05"),
        record("r3", "g2", 2000, "2025-01-20"),
        record("r4", "g1", 4000, "2025-02-05"),
        record("r5", "g2", 2000, "2025-02-20"),
    ];
    let expected = by_id(&replay(&goals, &records));

    let mut reversed = records.clone();
    reversed.reverse();
    assert_eq!(by_id(&replay(&goals, &reversed)), expected);

    let mut rotated = records.clone();
    rotated.rotate_left(2);
    assert_eq!(by_id(&replay(&goals, &rotated)), expected);
    assert_eq!(replay(&goals, &rotated), replay(&goals, &records));
}

#[test]
fn orphaned_records_pass_through_at_face_value() {
    let goals = vec![goal("g1", 12)];
    let records = vec![
        record("r1", "g1", 1000, "2025-01-01"),
        record("r2", "gone", 700, "2025-01-15"),
        record("r3", "gone", 300, "2025-02-15"),
    ];
    let out = by_id(&replay(&goals, &records));
    assert_eq!(out["r2"], (Decimal::ZERO, Decimal::from(700)));
    assert_eq!(out["r3"], (Decimal::ZERO, Decimal::from(300)));
    assert_eq!(out["r1"], (Decimal::from(10), Decimal::from(1010)));
}

#[test]
fn filter_goal_keeps_display_order() {
    let goals = vec![goal("a", 12), goal("b", 12)];
    let records = vec![
        record("r1", "a", 100, "2025-01-01"),
        record("r2", "b", 100, "2025-01-02"),
        record("r3", "a", 100, "2025-01-03"),
    ];
    let history = replay(&goals, &records);
    let only_a: Vec<&str> = filter_goal(&history, Some("a"))
        .iter()
        .map(|h| h.record.id.as_str())
        .collect();
    assert_eq!(only_a, vec!["r3", "r1"]);
    assert_eq!(filter_goal(&history, None).len(), 3);
}

#[test]
fn summary_adds_profit_to_net_savings() {
    let goals = vec![goal("g1", 12), goal("g2", 0)];
    let records = vec![
        record("r1", "g1", 1000, "2025-01-01"),
        record("r2", "g1", 1000, "2025-02-01"),
        record("r3", "g2", 400, "2025-02-01"),
    ];
    let s = summarize(&goals, &records);
    assert_eq!(s.net_savings, Decimal::from(2400));
    assert_eq!(s.accrued_profit, Decimal::from(30));
    assert_eq!(s.wealth_portfolio, Decimal::from(2430));
    assert_eq!(s.projected_maturity, Decimal::from(25000));
}

#[test]
fn huge_amounts_saturate_instead_of_panicking() {
    let goals = vec![goal("g1", 12)];
    let big = Decimal::MAX - Decimal::from(10);
    let mut records = vec![
        record("r1", "g1", 0, "2025-01-01"),
        record("r2", "g1", 0, "2025-02-01"),
    ];
    for r in &mut records {
        r.amount = big;
    }
    let history = replay(&goals, &records);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].running_balance, Decimal::MAX);

    let s = summarize(&goals, &records);
    assert_eq!(s.net_savings, Decimal::MAX);
    assert_eq!(s.wealth_portfolio, Decimal::MAX);
}
