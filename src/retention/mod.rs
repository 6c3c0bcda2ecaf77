// src/retention/mod.rs
//
// Decides, per inventory item, whether it is protected from being ground
// into goo. Checks run in a fixed order and the first hit retains the item.

pub mod policy;

pub use policy::{GamePolicy, ItemPolicy, MatchMethod};

use crate::errors::ConfigError;
use crate::models::ItemDescription;
use serde::Deserialize;
use std::fmt;

/// Items with fewer tags than this cannot be classified and are always kept.
pub const MIN_TAG_COUNT: usize = 3;

/// Everything that protects items from conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Blacklist {
    /// Exact application IDs to keep
    #[serde(default)]
    pub app_ids: Vec<u32>,
    /// Item types to keep, matched case-insensitively by containment
    #[serde(default)]
    pub item_types: Vec<String>,
    pub game: GamePolicy,
    pub item: ItemPolicy,
}

/// Why an item was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetainReason {
    TooFewTags,
    AppId,
    ItemType,
    GameName,
    ItemName,
    ItemTypeLong,
}

impl fmt::Display for RetainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RetainReason::TooFewTags => "too few tags to classify",
            RetainReason::AppId => "appid is on the blacklist",
            RetainReason::ItemType => "item type is on the blacklist",
            RetainReason::GameName => "game name is on the blacklist",
            RetainReason::ItemName => "item name is on the blacklist",
            RetainReason::ItemTypeLong => "item type (long) is on the blacklist",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionDecision {
    Convert,
    Retain(RetainReason),
}

impl RetentionDecision {
    pub fn is_convert(&self) -> bool {
        matches!(self, RetentionDecision::Convert)
    }
}

impl Blacklist {
    /// Runs the retention checks for `item`.
    pub fn evaluate(&self, item: &ItemDescription) -> RetentionDecision {
        let (game_name, item_type) = match (item.game_name(), item.item_type()) {
            (Some(game), Some(kind)) if item.tags.len() >= MIN_TAG_COUNT => (game, kind),
            _ => return RetentionDecision::Retain(RetainReason::TooFewTags),
        };

        if self.app_ids.contains(&item.app_id) {
            return RetentionDecision::Retain(RetainReason::AppId);
        }

        if policy::matches_contains(item_type, &self.item_types) {
            return RetentionDecision::Retain(RetainReason::ItemType);
        }

        if self.game.matches(game_name) {
            return RetentionDecision::Retain(RetainReason::GameName);
        }

        if self.item.matches(&item.name) {
            return RetentionDecision::Retain(RetainReason::ItemName);
        }

        if self.item.include_type_search && self.item.matches(&item.type_long) {
            return RetentionDecision::Retain(RetainReason::ItemTypeLong);
        }

        RetentionDecision::Convert
    }

    /// Returns true if `item` may be ground into goo.
    pub fn should_convert(&self, item: &ItemDescription) -> bool {
        self.evaluate(item).is_convert()
    }

    /// Rejects thresholds outside [0, 100].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("blacklist.game.threshold", self.game.method)?;
        check_threshold("blacklist.item.threshold", self.item.method)?;
        Ok(())
    }

    /// Lists the empty parts of the blacklist. Not an error, but usually a
    /// mistake worth pointing out before grinding starts.
    pub fn empty_fields(&self) -> Vec<&'static str> {
        let mut empty = Vec::new();
        if self.app_ids.is_empty() {
            empty.push("blacklist.app_ids");
        }
        if self.item_types.is_empty() {
            empty.push("blacklist.item_types");
        }
        if self.game.names.is_empty() {
            empty.push("blacklist.game.names");
        }
        if self.item.names.is_empty() {
            empty.push("blacklist.item.names");
        }
        empty
    }
}

fn check_threshold(field: &'static str, method: MatchMethod) -> Result<(), ConfigError> {
    match method.threshold() {
        Some(t) if !(0.0..=100.0).contains(&t) => Err(ConfigError::Invalid {
            field,
            reason: format!("{} is outside [0, 100]", t),
        }),
        _ => Ok(()),
    }
}
