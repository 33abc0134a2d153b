// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure calculations over goals and deposit records. Nothing in here touches
//! the database, the transaction ledger or the clock.

pub mod bulk;
pub mod projection;
pub mod replay;

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole currency units, halves away from zero.
pub fn round_unit(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Annual percent -> monthly fraction.
pub fn monthly_rate(annual_percent: Decimal) -> Decimal {
    annual_percent / Decimal::ONE_HUNDRED / Decimal::from(12)
}
