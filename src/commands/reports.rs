// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::load_book;
use crate::engine::replay::PortfolioSummary;
use crate::ledger::{LedgerFilter, list_transactions};
use crate::models::TransactionKind;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct GoalStanding {
    pub goal: String,
    pub deposited: Decimal,
    pub accrued_profit: Decimal,
    pub target: Decimal,
    pub progress_percent: Decimal,
    pub maturity_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    #[serde(flatten)]
    pub totals: PortfolioSummary,
    pub goals: Vec<GoalStanding>,
}

pub fn summary_report(conn: &Connection) -> Result<SummaryReport> {
    let book = load_book(conn)?;
    let mut profit_by_goal: HashMap<&str, Decimal> = HashMap::new();
    let history = book.history();
    for h in &history {
        let entry = profit_by_goal.entry(h.record.goal_id.as_str()).or_default();
        *entry = entry.saturating_add(h.step_profit);
    }
    let goals = book
        .goals()
        .iter()
        .map(|g| GoalStanding {
            goal: g.name.clone(),
            deposited: g.current_amount,
            accrued_profit: profit_by_goal.get(g.id.as_str()).copied().unwrap_or_default(),
            target: g.target_amount,
            progress_percent: g.progress_percent(),
            maturity_value: g.maturity_value,
        })
        .collect();
    Ok(SummaryReport {
        totals: book.summary(),
        goals,
    })
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = summary_report(conn)?;
    if maybe_print_json(sub, &report)? {
        return Ok(());
    }
    let ccy = Settings::load(conn)?.currency;
    let t = &report.totals;
    println!(
        "{}",
        pretty_table(
            &["Net Savings", "Accrued Profit", "Wealth Portfolio", "Projected Maturity"],
            vec![vec![
                fmt_money(&t.net_savings, &ccy),
                fmt_money(&t.accrued_profit, &ccy),
                fmt_money(&t.wealth_portfolio, &ccy),
                fmt_money(&t.projected_maturity, &ccy),
            ]]
        )
    );
    let rows = report
        .goals
        .iter()
        .map(|g| {
            vec![
                g.goal.clone(),
                g.deposited.to_string(),
                g.accrued_profit.to_string(),
                g.target.to_string(),
                format!("{}%", g.progress_percent),
                g.maturity_value.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Goal", "Deposited", "Profit (Est.)", "Target", "Progress", "Maturity Value"],
            rows
        )
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthFlow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income and expense per `YYYY-MM`, newest month first.
pub fn monthly_flows(conn: &Connection, month: Option<&str>, months: usize) -> Result<Vec<MonthFlow>> {
    let filter = LedgerFilter {
        month: month.map(parse_month).transpose()?,
        ..LedgerFilter::default()
    };
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in list_transactions(conn, &filter)? {
        let entry = map.entry(t.date.format("%Y-%m").to_string()).or_default();
        match t.kind {
            TransactionKind::Income => entry.0 = entry.0.saturating_add(t.amount),
            TransactionKind::Expense => entry.1 = entry.1.saturating_add(t.amount),
        }
    }
    Ok(map
        .into_iter()
        .rev()
        .take(months)
        .map(|(month, (income, expense))| MonthFlow {
            month,
            income,
            expense,
            net: income.saturating_sub(expense),
        })
        .collect())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub.get_one::<usize>("months").unwrap_or(&12);
    let month = sub.get_one::<String>("month").map(|s| s.as_str());
    let data = monthly_flows(conn, month, months)?;
    if !maybe_print_json(sub, &data)? {
        let rows = data
            .iter()
            .map(|f| {
                vec![
                    f.month.clone(),
                    format!("{:.2}", f.income),
                    format!("{:.2}", f.expense),
                    format!("{:.2}", f.net),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));
    }
    Ok(())
}
