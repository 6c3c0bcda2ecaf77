// src/traits.rs

use crate::errors::SteamError;
use crate::models::{GooQuote, GrindReceipt, InventoryPage};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of paged inventory data.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Fetches one page. `cursor` is None for the first page and otherwise the
    /// cursor returned by the previous page.
    async fn fetch_page(
        &self,
        account_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<InventoryPage, SteamError>;
}

/// The two-step goo exchange: quote a unit, then grind it at the quoted value.
///
/// Implementations report transport and decode problems as errors. Non-success
/// codes in a decoded reply are returned as-is for the caller to judge.
#[async_trait]
pub trait GooClient: Send + Sync {
    async fn goo_value(&self, app_id: u32, asset_id: &str) -> Result<GooQuote, SteamError>;

    /// The remote rejects the grind if the value no longer equals `expected_value`.
    async fn grind_into_goo(
        &self,
        app_id: u32,
        asset_id: &str,
        expected_value: &str,
    ) -> Result<GrindReceipt, SteamError>;
}

/// Shared handles so one connection can serve the aggregator and the pipeline.
pub type SharedInventoryClient = Arc<dyn InventoryClient>;
pub type SharedGooClient = Arc<dyn GooClient>;
