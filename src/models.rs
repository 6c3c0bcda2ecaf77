// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Inventory Types
// =============================================================================

/// A single owned copy of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Unique within its (class_id, instance_id) group
    pub asset_id: String,
    pub class_id: String,
    pub instance_id: String,
}

impl AssetRecord {
    pub fn new(
        asset_id: impl Into<String>,
        class_id: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            class_id: class_id.into(),
            instance_id: instance_id.into(),
        }
    }
}

/// Describes one kind of item. All assets sharing its (class_id, instance_id)
/// pair are fungible copies of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescription {
    pub name: String,
    /// Long type line, e.g. "Team Fortress 2 Trading Card"
    pub type_long: String,
    pub class_id: String,
    pub instance_id: String,
    /// Localized tag names. Index 1 is the game, index 2 the item type.
    pub tags: Vec<String>,
    pub app_id: u32,
}

impl ItemDescription {
    /// Name of the game this item belongs to.
    pub fn game_name(&self) -> Option<&str> {
        self.tags.get(1).map(String::as_str)
    }

    /// Short item type, e.g. "Trading Card" or "Emoticon".
    pub fn item_type(&self) -> Option<&str> {
        self.tags.get(2).map(String::as_str)
    }

    /// Returns true if the asset is a copy of this item.
    pub fn describes(&self, asset: &AssetRecord) -> bool {
        self.class_id == asset.class_id && self.instance_id == asset.instance_id
    }

    /// Log-friendly identification of the item.
    pub fn label(&self) -> ItemLabel<'_> {
        ItemLabel(self)
    }
}

/// Formats as `game="..." item="..." type="..."` for log lines.
pub struct ItemLabel<'a>(&'a ItemDescription);

impl fmt::Display for ItemLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "game={:?} item={:?} type={:?}",
            self.0.game_name().unwrap_or("-"),
            self.0.name,
            self.0.type_long
        )
    }
}

/// The aggregated view of a remote inventory.
///
/// Assets and descriptions are kept in arrival order across all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub assets: Vec<AssetRecord>,
    pub descriptions: Vec<ItemDescription>,
}

impl InventorySnapshot {
    /// Appends one page worth of records.
    pub fn extend(&mut self, assets: Vec<AssetRecord>, descriptions: Vec<ItemDescription>) {
        self.assets.extend(assets);
        self.descriptions.extend(descriptions);
    }

    /// Asset IDs of every copy of `item`, in snapshot order.
    pub fn asset_ids_for(&self, item: &ItemDescription) -> Vec<String> {
        self.assets
            .iter()
            .filter(|asset| item.describes(asset))
            .map(|asset| asset.asset_id.clone())
            .collect()
    }
}

/// One page of the remote inventory.
#[derive(Debug, Clone, Default)]
pub struct InventoryPage {
    pub assets: Vec<AssetRecord>,
    pub descriptions: Vec<ItemDescription>,
    /// Cursor for the next page; None once the inventory is exhausted.
    pub cursor: Option<String>,
    pub more: bool,
}

// =============================================================================
// Goo Exchange Types
// =============================================================================

/// Reply to a goo value quote. `success == 0` means the quote is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GooQuote {
    pub value: String,
    pub message: Option<String>,
    pub success: i32,
}

impl GooQuote {
    pub const SUCCESS: i32 = 0;

    pub fn is_success(&self) -> bool {
        self.success == Self::SUCCESS
    }
}

/// Reply to a grind request. `success == 1` means the item became goo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrindReceipt {
    pub goo_total: String,
    pub success: i32,
}

impl GrindReceipt {
    pub const SUCCESS: i32 = 1;

    pub fn is_success(&self) -> bool {
        self.success == Self::SUCCESS
    }
}

/// What happened to a single surplus unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Converted {
        asset_id: String,
        quoted_value: String,
        new_total: String,
    },
    Skipped {
        asset_id: String,
        reason: String,
    },
    Failed {
        asset_id: String,
        reason: String,
    },
}

impl ConversionOutcome {
    pub fn asset_id(&self) -> &str {
        match self {
            ConversionOutcome::Converted { asset_id, .. } => asset_id,
            ConversionOutcome::Skipped { asset_id, .. } => asset_id,
            ConversionOutcome::Failed { asset_id, .. } => asset_id,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionOutcome::Converted { .. })
    }
}
