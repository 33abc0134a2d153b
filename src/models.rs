// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GOAL_COLOR: &str = "#6366f1";

/// A savings plan. `target_amount`, `maturity_value` and `maturity_date` are
/// frozen when the goal is created or edited; `current_amount` is owned by
/// [`crate::book::SavingsBook`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub monthly_deposit: Decimal,
    pub years: Decimal,
    pub profit_percent: Decimal, // annual, percent units
    pub target_amount: Decimal,
    pub maturity_value: Decimal,
    pub current_amount: Decimal,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub color: String,
}

impl SavingsGoal {
    pub fn plan(&self) -> String {
        format!("{}/Mo", self.monthly_deposit.normalize())
    }

    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount.is_zero() {
            return Decimal::ZERO;
        }
        self.current_amount
            .checked_div(self.target_amount)
            .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED).round_dp(1))
            .unwrap_or(Decimal::MAX)
    }

    pub fn term_label(&self) -> String {
        crate::utils::term_label(self.years)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRecord {
    pub id: String,
    pub goal_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: SavingsRecord,
    pub step_profit: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("Unknown transaction type '{}' (use income|expense)", other)),
        }
    }
}

/// Entry in the general income/expense ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

impl NewTransaction {
    pub fn with_id(self, id: String) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}
