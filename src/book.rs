// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Goals and their deposit records.
//!
//! `SavingsBook` is the only writer of `SavingsGoal::current_amount`. Every
//! record mutation adjusts it incrementally so it always equals the sum of the
//! goal's record amounts, never dropping below zero.

use crate::engine::bulk::BulkCandidate;
use crate::engine::projection::{maturity_date, project};
use crate::engine::replay::{self, PortfolioSummary};
use crate::error::SavingsError;
use crate::ledger::TransactionBridge;
use crate::models::{
    AnnotatedRecord, DEFAULT_GOAL_COLOR, NewTransaction, SavingsGoal, SavingsRecord, Transaction,
    TransactionKind,
};
use crate::utils::new_id;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

pub const DEFAULT_MIRROR_CATEGORY: &str = "DPS";
pub const MIRROR_DESCRIPTION_PREFIX: &str = "Savings Deposit:";

/// Inputs of the goal form. Derived plan figures are computed from these.
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub name: String,
    pub monthly_deposit: Decimal,
    pub years: Decimal,
    pub profit_percent: Decimal,
    pub start_date: NaiveDate,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub goal_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct SavingsBook {
    goals: Vec<SavingsGoal>,
    records: Vec<SavingsRecord>,
    mirror_category: String,
}

impl Default for SavingsBook {
    fn default() -> Self {
        Self::new()
    }
}

impl SavingsBook {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }

    /// Rebuilds a book from persisted state. Cached `current_amount` values
    /// are taken as stored.
    pub fn from_parts(goals: Vec<SavingsGoal>, records: Vec<SavingsRecord>) -> Self {
        Self {
            goals,
            records,
            mirror_category: DEFAULT_MIRROR_CATEGORY.to_string(),
        }
    }

    pub fn with_mirror_category(mut self, category: impl Into<String>) -> Self {
        self.mirror_category = category.into();
        self
    }

    pub fn mirror_category(&self) -> &str {
        &self.mirror_category
    }

    pub fn goals(&self) -> &[SavingsGoal] {
        &self.goals
    }

    pub fn records(&self) -> &[SavingsRecord] {
        &self.records
    }

    pub fn into_parts(self) -> (Vec<SavingsGoal>, Vec<SavingsRecord>) {
        (self.goals, self.records)
    }

    pub fn goal(&self, id: &str) -> Option<&SavingsGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Case-insensitive lookup, falling back to an exact id match.
    pub fn goal_by_name(&self, name: &str) -> Option<&SavingsGoal> {
        let name = name.trim();
        self.goals
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .or_else(|| self.goal(name))
    }

    pub fn record(&self, id: &str) -> Option<&SavingsRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Finds a record by full id or by a unique id prefix.
    pub fn resolve_record(&self, id_or_prefix: &str) -> Result<&SavingsRecord, SavingsError> {
        let key = id_or_prefix.trim();
        if key.is_empty() {
            return Err(SavingsError::Validation("record id is required".into()));
        }
        if let Some(r) = self.record(key) {
            return Ok(r);
        }
        let mut hits = self.records.iter().filter(|r| r.id.starts_with(key));
        match (hits.next(), hits.next()) {
            (Some(r), None) => Ok(r),
            (Some(_), Some(_)) => Err(SavingsError::Validation(format!(
                "record id prefix '{}' is ambiguous",
                key
            ))),
            _ => Err(SavingsError::RecordNotFound(key.to_string())),
        }
    }

    pub fn records_for_goal<'a>(&'a self, goal_id: &'a str) -> impl Iterator<Item = &'a SavingsRecord> + 'a {
        self.records.iter().filter(move |r| r.goal_id == goal_id)
    }

    /// Replayed history, newest first.
    pub fn history(&self) -> Vec<AnnotatedRecord> {
        replay::replay(&self.goals, &self.records)
    }

    pub fn summary(&self) -> PortfolioSummary {
        replay::summarize(&self.goals, &self.records)
    }

    /// Goals whose cached `current_amount` matches neither the sum of their
    /// records nor that sum floored at zero, as `(goal id, cached, sum)`.
    pub fn aggregate_drift(&self) -> Vec<(String, Decimal, Decimal)> {
        self.goals
            .iter()
            .filter_map(|g| {
                let sum = self
                    .records_for_goal(&g.id)
                    .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount));
                let cached = g.current_amount;
                (cached != sum && cached != sum.max(Decimal::ZERO)).then(|| (g.id.clone(), cached, sum))
            })
            .collect()
    }

    pub fn orphaned_records(&self) -> Vec<&SavingsRecord> {
        self.records
            .iter()
            .filter(|r| self.goal(&r.goal_id).is_none())
            .collect()
    }

    pub fn create_goal(&mut self, draft: GoalDraft) -> Result<String, SavingsError> {
        let plan = plan_from_draft(&draft)?;
        let goal = SavingsGoal {
            id: new_id(),
            name: draft.name.trim().to_string(),
            monthly_deposit: draft.monthly_deposit,
            years: draft.years,
            profit_percent: draft.profit_percent,
            target_amount: plan.target_amount,
            maturity_value: plan.maturity_value,
            current_amount: Decimal::ZERO,
            start_date: draft.start_date,
            maturity_date: plan.maturity_date,
            color: draft.color.unwrap_or_else(|| DEFAULT_GOAL_COLOR.to_string()),
        };
        info!(goal = %goal.id, name = %goal.name, "created savings goal");
        let id = goal.id.clone();
        self.goals.push(goal);
        Ok(id)
    }

    /// Replaces the plan of an existing goal. `current_amount` and the
    /// goal's records are left alone.
    pub fn edit_goal(&mut self, goal_id: &str, draft: GoalDraft) -> Result<(), SavingsError> {
        let plan = plan_from_draft(&draft)?;
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| SavingsError::GoalNotFound(goal_id.to_string()))?;
        goal.name = draft.name.trim().to_string();
        goal.monthly_deposit = draft.monthly_deposit;
        goal.years = draft.years;
        goal.profit_percent = draft.profit_percent;
        goal.target_amount = plan.target_amount;
        goal.maturity_value = plan.maturity_value;
        goal.start_date = draft.start_date;
        goal.maturity_date = plan.maturity_date;
        if let Some(color) = draft.color {
            goal.color = color;
        }
        info!(goal = %goal_id, "updated savings goal");
        Ok(())
    }

    /// Removes the goal, its records, and their mirrored transactions.
    /// Ledger failures are logged and do not stop the cascade.
    pub fn delete_goal(
        &mut self,
        goal_id: &str,
        bridge: &mut impl TransactionBridge,
    ) -> Result<usize, SavingsError> {
        if self.goal(goal_id).is_none() {
            return Err(SavingsError::GoalNotFound(goal_id.to_string()));
        }
        for tx_id in self
            .records_for_goal(goal_id)
            .filter_map(|r| r.transaction_id.as_deref())
        {
            if let Err(err) = bridge.delete_transaction(tx_id) {
                warn!(goal = %goal_id, transaction = %tx_id, error = %err, "could not delete mirrored transaction");
            }
        }
        let before = self.records.len();
        self.records.retain(|r| r.goal_id != goal_id);
        let removed = before - self.records.len();
        self.goals.retain(|g| g.id != goal_id);
        info!(goal = %goal_id, records = removed, "deleted savings goal");
        Ok(removed)
    }

    /// Mirrors the deposit into the ledger, then appends the record. A
    /// missing goal is tolerated: the record is kept and no total changes.
    pub fn create_record(
        &mut self,
        draft: RecordDraft,
        bridge: &mut impl TransactionBridge,
    ) -> Result<String, SavingsError> {
        if draft.goal_id.trim().is_empty() {
            return Err(SavingsError::Validation("a goal must be selected".into()));
        }
        let total = self.raised_total(&draft.goal_id, draft.amount)?;
        let description = self.mirror_description(&draft.goal_id, &draft.note);
        let transaction_id = bridge.add_transaction(NewTransaction {
            kind: TransactionKind::Expense,
            category: self.mirror_category.clone(),
            amount: draft.amount,
            date: draft.date,
            description,
        })?;
        let record = SavingsRecord {
            id: new_id(),
            goal_id: draft.goal_id,
            amount: draft.amount,
            date: draft.date,
            note: draft.note,
            transaction_id: Some(transaction_id),
        };
        self.store_total(&record.goal_id, total);
        debug!(record = %record.id, goal = %record.goal_id, amount = %record.amount, "recorded deposit");
        let id = record.id.clone();
        self.records.push(record);
        Ok(id)
    }

    pub fn edit_record(
        &mut self,
        record_id: &str,
        draft: RecordDraft,
        bridge: &mut impl TransactionBridge,
    ) -> Result<(), SavingsError> {
        if draft.goal_id.trim().is_empty() {
            return Err(SavingsError::Validation("a goal must be selected".into()));
        }
        let idx = self
            .records
            .iter()
            .position(|r| r.id == record_id)
            .ok_or_else(|| SavingsError::RecordNotFound(record_id.to_string()))?;
        let old = self.records[idx].clone();

        let totals = if old.goal_id == draft.goal_id {
            let delta = draft.amount.checked_sub(old.amount).ok_or_else(|| out_of_range(&draft.goal_id))?;
            vec![(draft.goal_id.clone(), self.raised_total(&draft.goal_id, delta)?)]
        } else {
            vec![
                (old.goal_id.clone(), self.lowered_total(&old.goal_id, old.amount)?),
                (draft.goal_id.clone(), self.raised_total(&draft.goal_id, draft.amount)?),
            ]
        };

        if let Some(tx_id) = &old.transaction_id {
            let mirrored = Transaction {
                id: tx_id.clone(),
                kind: TransactionKind::Expense,
                category: self.mirror_category.clone(),
                amount: draft.amount,
                date: draft.date,
                description: self.mirror_description(&draft.goal_id, &draft.note),
            };
            if let Err(err) = bridge.edit_transaction(&mirrored) {
                warn!(record = %record_id, transaction = %tx_id, error = %err, "could not update mirrored transaction");
            }
        }

        for (goal_id, total) in totals {
            self.store_total(&goal_id, total);
        }

        let rec = &mut self.records[idx];
        rec.goal_id = draft.goal_id;
        rec.amount = draft.amount;
        rec.date = draft.date;
        rec.note = draft.note;
        debug!(record = %record_id, "updated deposit");
        Ok(())
    }

    pub fn delete_record(
        &mut self,
        record_id: &str,
        bridge: &mut impl TransactionBridge,
    ) -> Result<SavingsRecord, SavingsError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == record_id)
            .ok_or_else(|| SavingsError::RecordNotFound(record_id.to_string()))?;
        let (goal_id, amount) = (self.records[idx].goal_id.clone(), self.records[idx].amount);
        let total = self.lowered_total(&goal_id, amount)?;
        if let Some(tx_id) = &self.records[idx].transaction_id {
            if let Err(err) = bridge.delete_transaction(tx_id) {
                warn!(record = %record_id, transaction = %tx_id, error = %err, "could not delete mirrored transaction");
            }
        }
        let removed = self.records.remove(idx);
        self.store_total(&goal_id, total);
        debug!(record = %record_id, "deleted deposit");
        Ok(removed)
    }

    /// Commits parsed bulk rows against one goal: one mirrored transaction
    /// per row, one append, one total update. If the ledger rejects a row,
    /// the rows already mirrored are withdrawn and nothing is appended.
    pub fn import_records(
        &mut self,
        goal_id: &str,
        candidates: &[BulkCandidate],
        bridge: &mut impl TransactionBridge,
    ) -> Result<Vec<String>, SavingsError> {
        if candidates.is_empty() {
            return Err(SavingsError::Validation("nothing to import".into()));
        }
        if self.goal(goal_id).is_none() {
            return Err(SavingsError::GoalNotFound(goal_id.to_string()));
        }
        let total = candidates
            .iter()
            .try_fold(Decimal::ZERO, |acc, c| acc.checked_add(c.amount))
            .ok_or_else(|| out_of_range(goal_id))?;
        let next_total = self.raised_total(goal_id, total)?;

        let mut batch: Vec<SavingsRecord> = Vec::with_capacity(candidates.len());
        for c in candidates {
            let added = bridge.add_transaction(NewTransaction {
                kind: TransactionKind::Expense,
                category: self.mirror_category.clone(),
                amount: c.amount,
                date: c.date,
                description: self.mirror_description(goal_id, &c.note),
            });
            let transaction_id = match added {
                Ok(id) => id,
                Err(err) => {
                    for rec in &batch {
                        if let Some(tx_id) = &rec.transaction_id {
                            if let Err(undo) = bridge.delete_transaction(tx_id) {
                                warn!(transaction = %tx_id, error = %undo, "could not withdraw mirrored transaction");
                            }
                        }
                    }
                    return Err(err.into());
                }
            };
            batch.push(SavingsRecord {
                id: new_id(),
                goal_id: goal_id.to_string(),
                amount: c.amount,
                date: c.date,
                note: c.note.clone(),
                transaction_id: Some(transaction_id),
            });
        }

        let ids = batch.iter().map(|r| r.id.clone()).collect();
        self.records.extend(batch);
        self.store_total(goal_id, next_total);
        info!(goal = %goal_id, rows = candidates.len(), total = %total, "imported deposits");
        Ok(ids)
    }

    fn mirror_description(&self, goal_id: &str, note: &str) -> String {
        let goal_name = self.goal(goal_id).map(|g| g.name.as_str()).unwrap_or("Account");
        let note = if note.trim().is_empty() { "Monthly" } else { note };
        format!("{} {} ({})", MIRROR_DESCRIPTION_PREFIX, goal_name, note)
    }

    /// The goal's total after adding `delta`, or `None` when the goal is
    /// missing.
    fn raised_total(&self, goal_id: &str, delta: Decimal) -> Result<Option<Decimal>, SavingsError> {
        let Some(goal) = self.goal(goal_id) else {
            return Ok(None);
        };
        goal.current_amount
            .checked_add(delta)
            .map(Some)
            .ok_or_else(|| out_of_range(goal_id))
    }

    /// The goal's total after taking `amount` out, floored at zero.
    fn lowered_total(&self, goal_id: &str, amount: Decimal) -> Result<Option<Decimal>, SavingsError> {
        let Some(goal) = self.goal(goal_id) else {
            return Ok(None);
        };
        let next = goal
            .current_amount
            .checked_sub(amount)
            .ok_or_else(|| out_of_range(goal_id))?;
        if next < Decimal::ZERO {
            warn!(goal = %goal_id, current = %goal.current_amount, amount = %amount, "goal total would go negative; clamped to zero");
            return Ok(Some(Decimal::ZERO));
        }
        Ok(Some(next))
    }

    fn store_total(&mut self, goal_id: &str, total: Option<Decimal>) {
        match (self.goals.iter_mut().find(|g| g.id == goal_id), total) {
            (Some(goal), Some(total)) => goal.current_amount = total,
            _ => warn!(goal = %goal_id, "deposit references a missing goal; total left unchanged"),
        }
    }
}

fn out_of_range(goal_id: &str) -> SavingsError {
    SavingsError::Validation(format!("total for goal {} is out of range", goal_id))
}

struct Plan {
    target_amount: Decimal,
    maturity_value: Decimal,
    maturity_date: NaiveDate,
}

fn plan_from_draft(draft: &GoalDraft) -> Result<Plan, SavingsError> {
    if draft.name.trim().is_empty() {
        return Err(SavingsError::Validation("goal name is required".into()));
    }
    if draft.monthly_deposit <= Decimal::ZERO || draft.years <= Decimal::ZERO {
        return Err(SavingsError::Validation(
            "monthly deposit and years must both be positive".into(),
        ));
    }
    let projection = project(draft.monthly_deposit, draft.profit_percent, draft.years).ok_or_else(|| {
        SavingsError::Validation("plan figures are too large to project".into())
    })?;
    let maturity = maturity_date(draft.start_date, draft.years)
        .ok_or_else(|| SavingsError::Validation("maturity date is out of range".into()))?;
    Ok(Plan {
        target_amount: projection.total_principal,
        maturity_value: projection.maturity_value,
        maturity_date: maturity,
    })
}
