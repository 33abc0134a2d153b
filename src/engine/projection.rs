// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{monthly_rate, round_unit};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Planned outcome of a monthly deposit scheme, whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub total_months: u32,
    pub total_principal: Decimal,
    pub maturity_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub deposit: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub balance: Decimal,
}

/// Simulates `round(years * 12)` months of deposit-then-interest compounding.
///
/// Returns `None` when the deposit or the term is not positive, or when the
/// numbers overflow; callers clear any derived fields in that case.
pub fn project(monthly_deposit: Decimal, annual_rate_percent: Decimal, years: Decimal) -> Option<Projection> {
    simulate(monthly_deposit, annual_rate_percent, years, |_| {})
}

/// Month-by-month view of the same simulation `project` runs. Amounts in the
/// rows are kept at full precision.
pub fn schedule(
    monthly_deposit: Decimal,
    annual_rate_percent: Decimal,
    years: Decimal,
) -> Option<Vec<ScheduleRow>> {
    let mut rows = Vec::new();
    simulate(monthly_deposit, annual_rate_percent, years, |row| rows.push(row))?;
    Some(rows)
}

fn simulate(
    monthly_deposit: Decimal,
    annual_rate_percent: Decimal,
    years: Decimal,
    mut on_month: impl FnMut(ScheduleRow),
) -> Option<Projection> {
    if monthly_deposit <= Decimal::ZERO || years <= Decimal::ZERO {
        return None;
    }
    let total_months = round_unit(years.checked_mul(Decimal::from(12))?).to_u32()?;
    let rate = monthly_rate(annual_rate_percent);

    let mut balance = Decimal::ZERO;
    let mut principal = Decimal::ZERO;
    for month in 1..=total_months {
        balance = balance.checked_add(monthly_deposit)?;
        principal = principal.checked_add(monthly_deposit)?;
        let interest = balance.checked_mul(rate)?;
        balance = balance.checked_add(interest)?;
        on_month(ScheduleRow {
            month,
            deposit: monthly_deposit,
            interest,
            principal,
            balance,
        });
    }

    Some(Projection {
        total_months,
        total_principal: round_unit(principal),
        maturity_value: round_unit(balance),
    })
}

/// `start + floor(years) years + round(frac(years) * 12) months`, with the
/// day clamped to the end of shorter months.
pub fn maturity_date(start: NaiveDate, years: Decimal) -> Option<NaiveDate> {
    if years.is_sign_negative() {
        return None;
    }
    let whole_years = years.trunc().to_u32()?;
    let extra_months = round_unit(years.fract() * Decimal::from(12)).to_u32()?;
    let months = whole_years.checked_mul(12)?.checked_add(extra_months)?;
    start.checked_add_months(Months::new(months))
}
