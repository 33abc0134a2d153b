// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Parser for deposit rows pasted from a spreadsheet or bank statement:
//! `date<TAB>amount[<TAB>note]`, or the same columns separated by runs of
//! two or more spaces.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub const MAX_BULK_LINES: usize = 50;
pub const DEFAULT_BULK_NOTE: &str = "Bulk Deposit";

static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("static regex"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkCandidate {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkParse {
    pub candidates: Vec<BulkCandidate>,
    /// Non-blank lines within the limit that did not parse.
    pub dropped: usize,
    /// Lines past [`MAX_BULK_LINES`], never looked at.
    pub truncated: usize,
}

/// Never fails: unparseable lines are counted in `dropped` and skipped.
pub fn parse_bulk_input(text: &str) -> BulkParse {
    let mut out = BulkParse::default();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return out;
    }
    for (idx, line) in trimmed.lines().enumerate() {
        if idx >= MAX_BULK_LINES {
            out.truncated += 1;
            continue;
        }
        match parse_line(line) {
            Some(c) => out.candidates.push(c),
            None if line.trim().is_empty() => {}
            None => out.dropped += 1,
        }
    }
    out
}

fn split_fields(line: &str) -> Vec<&str> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() >= 2 {
        return parts;
    }
    SPACE_RUN
        .split(line)
        .filter(|p| !p.trim().is_empty())
        .collect()
}

fn parse_line(line: &str) -> Option<BulkCandidate> {
    let fields = split_fields(line);
    if fields.len() < 2 {
        return None;
    }
    let date = parse_loose_date(fields[0].trim())?;
    let amount = Decimal::from_str(&fields[1].trim().replace(',', "")).ok()?;
    let note = fields
        .get(2)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BULK_NOTE)
        .to_string();
    Some(BulkCandidate { amount, date, note })
}

/// ISO days, slashed ISO days, the `5 Feb 2026` form the history table
/// prints, `Feb 5, 2026`, and RFC 3339 timestamps (taken in UTC).
pub fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.naive_utc().date()))
}
