// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::DEFAULT_MIRROR_CATEGORY;
use crate::utils::{get_setting, set_setting};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

pub const KEY_CURRENCY: &str = "currency";
pub const KEY_MIRROR_CATEGORY: &str = "mirror_category";
pub const KEY_SYNC_URL: &str = "sync_url";
pub const KEY_SYNC_TOKEN: &str = "sync_token";

pub const KNOWN_KEYS: &[&str] = &[KEY_CURRENCY, KEY_MIRROR_CATEGORY, KEY_SYNC_URL, KEY_SYNC_TOKEN];

const DEFAULT_CURRENCY: &str = "BDT";

/// Settings resolved from the `settings` table, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub currency: String,
    pub mirror_category: String,
    pub sync_url: Option<String>,
    #[serde(skip_serializing)]
    pub sync_token: Option<String>,
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Self {
            currency: get_setting(conn, KEY_CURRENCY)?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            mirror_category: get_setting(conn, KEY_MIRROR_CATEGORY)?
                .unwrap_or_else(|| DEFAULT_MIRROR_CATEGORY.to_string()),
            sync_url: get_setting(conn, KEY_SYNC_URL)?.filter(|s| !s.is_empty()),
            sync_token: get_setting(conn, KEY_SYNC_TOKEN)?.filter(|s| !s.is_empty()),
        })
    }
}

pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        bail!("Unknown setting '{}' (known: {})", key, KNOWN_KEYS.join(", "));
    }
    let value = value.trim();
    if key == KEY_MIRROR_CATEGORY && value.is_empty() {
        bail!("mirror_category cannot be empty");
    }
    set_setting(conn, key, value)
}

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    if !KNOWN_KEYS.contains(&key) {
        bail!("Unknown setting '{}' (known: {})", key, KNOWN_KEYS.join(", "));
    }
    let settings = Settings::load(conn)?;
    Ok(match key {
        KEY_CURRENCY => Some(settings.currency),
        KEY_MIRROR_CATEGORY => Some(settings.mirror_category),
        KEY_SYNC_URL => settings.sync_url,
        _ => settings.sync_token.map(|_| "********".to_string()),
    })
}
