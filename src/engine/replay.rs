// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{monthly_rate, round_unit};
use crate::models::{AnnotatedRecord, SavingsGoal, SavingsRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Replays every record oldest-first and returns them newest-first with the
/// profit accrued at each step and the goal's balance after it.
///
/// Each goal compounds one month of interest per deposit on its balance after
/// the deposit. Balances are carried at full precision; only the emitted
/// figures are rounded. Records whose goal no longer exists pass through with
/// zero profit and their own amount as the balance.
///
/// Records on the same date are replayed in id order so the result does not
/// depend on the order of `records`.
pub fn replay(goals: &[SavingsGoal], records: &[SavingsRecord]) -> Vec<AnnotatedRecord> {
    let by_id: HashMap<&str, &SavingsGoal> = goals.iter().map(|g| (g.id.as_str(), g)).collect();
    let mut balances: HashMap<&str, Decimal> =
        goals.iter().map(|g| (g.id.as_str(), Decimal::ZERO)).collect();

    let mut ascending: Vec<&SavingsRecord> = records.iter().collect();
    ascending.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut out: Vec<AnnotatedRecord> = ascending
        .into_iter()
        .map(|record| {
            let Some(goal) = by_id.get(record.goal_id.as_str()) else {
                return AnnotatedRecord {
                    record: record.clone(),
                    step_profit: Decimal::ZERO,
                    running_balance: record.amount,
                };
            };
            let tracked = balances.entry(goal.id.as_str()).or_insert(Decimal::ZERO);
            let after_deposit = tracked.saturating_add(record.amount);
            let profit = after_deposit.saturating_mul(monthly_rate(goal.profit_percent));
            *tracked = after_deposit.saturating_add(profit);
            AnnotatedRecord {
                record: record.clone(),
                step_profit: round_unit(profit),
                running_balance: round_unit(*tracked),
            }
        })
        .collect();

    out.reverse();
    out
}

/// Narrows a replayed history to one goal; `None` keeps everything.
pub fn filter_goal<'a>(
    history: &'a [AnnotatedRecord],
    goal_id: Option<&str>,
) -> Vec<&'a AnnotatedRecord> {
    history
        .iter()
        .filter(|h| goal_id.is_none_or(|id| h.record.goal_id == id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub net_savings: Decimal,
    pub accrued_profit: Decimal,
    pub wealth_portfolio: Decimal,
    pub projected_maturity: Decimal,
}

pub fn summarize(goals: &[SavingsGoal], records: &[SavingsRecord]) -> PortfolioSummary {
    let net_savings = saturating_sum(records.iter().map(|r| r.amount));
    let accrued_profit = saturating_sum(replay(goals, records).iter().map(|h| h.step_profit));
    let projected_maturity = saturating_sum(goals.iter().map(|g| g.maturity_value));
    PortfolioSummary {
        net_savings,
        accrued_profit,
        wealth_portfolio: net_savings.saturating_add(accrued_profit),
        projected_maturity,
    }
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}
