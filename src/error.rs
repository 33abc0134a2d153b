// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Transaction not found: {0}")]
    NotFound(String),
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum SavingsError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Goal not found: {0}")]
    GoalNotFound(String),
    #[error("Record not found: {0}")]
    RecordNotFound(String),
    #[error("Transaction ledger: {0}")]
    Bridge(#[from] LedgerError),
}
