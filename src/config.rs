// src/config.rs
//
// Configuration file parsing. A TOML file names the account, run settings
// and the retention blacklist.

use crate::connectors::SteamCredentials;
use crate::engine::RunSettings;
use crate::errors::ConfigError;
use crate::inventory::DEFAULT_PAGE_SIZE;
use crate::retention::Blacklist;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables that override the credentials in the file.
pub const SESSION_ID_ENV: &str = "GOO_SESSION_ID";
pub const ACCESS_TOKEN_ENV: &str = "GOO_ACCESS_TOKEN";

// =============================================================================
// Configuration Types
// =============================================================================

/// Root configuration structure.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub account: SteamCredentials,
    pub run: RunConfig,
    pub blacklist: Blacklist,
}

/// How much of the inventory to read and how much of it to keep.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Copies of each item that are never ground
    pub keep_count: usize,
    /// Follow every inventory page instead of only the first
    pub load_entire_inventory: bool,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Log what would be ground without grinding it
    #[serde(default)]
    pub dry_run: bool,
    /// Log level (overridden by RUST_LOG)
    pub log_level: Option<String>,
    /// Also append log output to this file
    pub log_file: Option<PathBuf>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl Config {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate the result.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces credentials with non-empty values returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(session_id) = lookup(SESSION_ID_ENV).filter(|v| !v.is_empty()) {
            self.account.session_id = session_id;
        }
        if let Some(access_token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.account.access_token = access_token;
        }
    }

    /// Checks required fields and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("account.steam_id", &self.account.steam_id),
            ("account.vanity", &self.account.vanity),
            ("account.session_id", &self.account.session_id),
            ("account.access_token", &self.account.access_token),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(field));
            }
        }

        if self.run.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "run.page_size",
                reason: "must be at least 1".to_string(),
            });
        }

        self.blacklist.validate()
    }

    /// Run settings for the engine.
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            account_id: self.account.steam_id.clone(),
            page_size: self.run.page_size,
            load_all: self.run.load_entire_inventory,
            keep_count: self.run.keep_count,
        }
    }
}

// =============================================================================
// Default Configuration
// =============================================================================

/// Returns a default configuration string for documentation.
pub fn default_config_template() -> &'static str {
    r#"# goo-grinder configuration
#
# Every copy of an item beyond `keep_count` is ground into goo, unless the
# blacklist protects it.

[account]
# 64-bit Steam ID
steam_id = "76561190000000000"
# Custom URL name: steamcommunity.com/id/<vanity>
vanity = "your-vanity-name"
# From the steamcommunity.com cookies. GOO_SESSION_ID / GOO_ACCESS_TOKEN
# override these.
session_id = ""
access_token = ""

[run]
keep_count = 1
load_entire_inventory = true
# page_size = 5000
# dry_run = false
# log_level = "info"
# log_file = "log.txt"

[blacklist]
# Exact app IDs whose items are never ground
app_ids = [753]
# Item types (third tag), matched case-insensitively
item_types = ["Emoticon", "Profile Background"]

[blacklist.game]
# contains | levenshtein | both
method = "both"
names = ["Team Fortress 2"]
# Similarity (0-100) needed by levenshtein and both
threshold = 90

[blacklist.item]
method = "contains"
names = ["Gems"]
threshold = 90
# Also match the names against the long type line
include_type_search = true
"#
}

// =============================================================================
// Tests
// =============================================================================
