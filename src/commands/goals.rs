// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{goal_id_for, with_book};
use crate::book::GoalDraft;
use crate::config::Settings;
use crate::db::load_book;
use crate::engine::projection::{maturity_date, project, schedule};
use crate::models::SavingsGoal;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("project", sub)) => preview(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_decimal(sub: &clap::ArgMatches, name: &str) -> Result<Option<Decimal>> {
    sub.get_one::<String>(name)
        .map(|s| parse_decimal(s).with_context(|| format!("--{}", name)))
        .transpose()
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let draft = GoalDraft {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        monthly_deposit: parse_decimal(sub.get_one::<String>("monthly").unwrap())?,
        years: parse_decimal(sub.get_one::<String>("years").unwrap())?,
        profit_percent: parse_decimal(sub.get_one::<String>("rate").unwrap())?,
        start_date: match sub.get_one::<String>("start") {
            Some(s) => parse_date(s)?,
            None => today(),
        },
        color: sub.get_one::<String>("color").map(|s| s.trim().to_string()),
    };
    let ccy = Settings::load(conn)?.currency;
    let goal = with_book(conn, |book, _| {
        if book.goal_by_name(&draft.name).is_some() {
            bail!("Goal '{}' already exists", draft.name);
        }
        let id = book.create_goal(draft)?;
        Ok(book.goal(&id).cloned().context("goal vanished after create")?)
    })?;
    println!(
        "Created goal '{}' [{}]: target {}, maturity {} on {}",
        goal.name,
        goal.id,
        fmt_money(&goal.target_amount, &ccy),
        fmt_money(&goal.maturity_value, &ccy),
        goal.maturity_date
    );
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("goal").unwrap();
    let monthly = opt_decimal(sub, "monthly")?;
    let years = opt_decimal(sub, "years")?;
    let rate = opt_decimal(sub, "rate")?;
    let start = sub.get_one::<String>("start").map(|s| parse_date(s)).transpose()?;
    let name = sub.get_one::<String>("name").map(|s| s.trim().to_string());
    let color = sub.get_one::<String>("color").map(|s| s.trim().to_string());
    let ccy = Settings::load(conn)?.currency;

    let goal = with_book(conn, |book, _| {
        let id = goal_id_for(book, key)?;
        let current = book.goal(&id).context("goal vanished")?;
        if let Some(n) = &name {
            if book.goal_by_name(n).is_some_and(|g| g.id != id) {
                bail!("Goal '{}' already exists", n);
            }
        }
        let draft = GoalDraft {
            name: name.clone().unwrap_or_else(|| current.name.clone()),
            monthly_deposit: monthly.unwrap_or(current.monthly_deposit),
            years: years.unwrap_or(current.years),
            profit_percent: rate.unwrap_or(current.profit_percent),
            start_date: start.unwrap_or(current.start_date),
            color,
        };
        book.edit_goal(&id, draft)?;
        Ok(book.goal(&id).cloned().context("goal vanished after edit")?)
    })?;
    println!("{}", edit_summary(&goal, &ccy));
    Ok(())
}

pub fn edit_summary(goal: &SavingsGoal, ccy: &str) -> String {
    format!(
        "Updated goal '{}': target {}, maturity {} on {}",
        goal.name,
        fmt_money(&goal.target_amount, ccy),
        fmt_money(&goal.maturity_value, ccy),
        goal.maturity_date
    )
}

fn remove(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("goal").unwrap();
    let (name, removed) = with_book(conn, |book, ledger| {
        let id = goal_id_for(book, key)?;
        let name = book.goal(&id).map(|g| g.name.clone()).unwrap_or_default();
        let removed = book.delete_goal(&id, ledger)?;
        Ok((name, removed))
    })?;
    println!("Removed goal '{}' and {} linked deposit(s)", name, removed);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct GoalRow {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    pub plan: String,
    pub term: String,
    pub progress_percent: Decimal,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<GoalRow>> {
    let book = load_book(conn)?;
    Ok(book
        .goals()
        .iter()
        .map(|g| GoalRow {
            plan: g.plan(),
            term: g.term_label(),
            progress_percent: g.progress_percent(),
            goal: g.clone(),
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn)?;
    if maybe_print_json(sub, &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.goal.id.clone(),
                r.goal.name.clone(),
                r.plan.clone(),
                format!("{}%", r.goal.profit_percent.normalize()),
                r.term.clone(),
                r.goal.start_date.to_string(),
                r.goal.maturity_date.to_string(),
                r.goal.target_amount.to_string(),
                r.goal.current_amount.to_string(),
                format!("{}%", r.progress_percent),
                r.goal.maturity_value.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Name", "Plan", "Rate", "Term", "Start", "Matures", "Target", "Saved",
                "Progress", "Maturity Value"
            ],
            rows
        )
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct PreviewOut {
    total_months: u32,
    total_principal: Decimal,
    maturity_value: Decimal,
    profit: Decimal,
    maturity_date: Option<chrono::NaiveDate>,
}

fn preview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let monthly = parse_decimal(sub.get_one::<String>("monthly").unwrap())?;
    let years = parse_decimal(sub.get_one::<String>("years").unwrap())?;
    let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
    let Some(p) = project(monthly, rate, years) else {
        bail!("Monthly deposit and years must both be positive");
    };

    if sub.get_flag("schedule") {
        let rows = schedule(monthly, rate, years).unwrap_or_default();
        if maybe_print_json(sub, &rows)? {
            return Ok(());
        }
        let table = rows
            .iter()
            .map(|r| {
                vec![
                    r.month.to_string(),
                    format!("{:.2}", r.deposit),
                    format!("{:.2}", r.interest),
                    format!("{:.2}", r.principal),
                    format!("{:.2}", r.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Deposit", "Interest", "Principal", "Balance"], table)
        );
        return Ok(());
    }

    let out = PreviewOut {
        total_months: p.total_months,
        total_principal: p.total_principal,
        maturity_value: p.maturity_value,
        profit: p.maturity_value - p.total_principal,
        maturity_date: maturity_date(today(), years),
    };
    if maybe_print_json(sub, &out)? {
        return Ok(());
    }
    let ccy = Settings::load(conn)?.currency;
    println!(
        "{}",
        pretty_table(
            &["Months", "Principal", "Maturity Value", "Profit", "Matures (from today)"],
            vec![vec![
                out.total_months.to_string(),
                fmt_money(&out.total_principal, &ccy),
                fmt_money(&out.maturity_value, &ccy),
                fmt_money(&out.profit, &ccy),
                out.maturity_date.map(|d| d.to_string()).unwrap_or_default(),
            ]]
        )
    );
    Ok(())
}
