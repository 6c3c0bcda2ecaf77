// src/inventory/mod.rs
//
// Paged inventory aggregation. Pulls pages from an InventoryClient and merges
// them into one InventorySnapshot.

use crate::errors::InventoryError;
use crate::models::InventorySnapshot;
use crate::traits::SharedInventoryClient;
use log::info;

/// Steam serves at most this many assets per inventory page.
pub const DEFAULT_PAGE_SIZE: u32 = 5000;

pub struct InventoryAggregator {
    client: SharedInventoryClient,
}

impl InventoryAggregator {
    pub fn new(client: SharedInventoryClient) -> Self {
        Self { client }
    }

    /// Loads the inventory of `account_id`.
    ///
    /// With `load_all` unset only the first page is read. Otherwise pages are
    /// followed until the remote reports no more items. Any failed page fails
    /// the whole load: a partial view would mis-count the copies of items that
    /// straddle a page boundary.
    pub async fn load_inventory(
        &self,
        account_id: &str,
        page_size: u32,
        load_all: bool,
    ) -> Result<InventorySnapshot, InventoryError> {
        let mut snapshot = InventorySnapshot::default();
        let mut cursor: Option<String> = None;
        let mut page = 0;

        loop {
            page += 1;
            if let Some(c) = &cursor {
                info!("Loading more inventory items (page {}, start_assetid {})", page, c);
            }

            let batch = self
                .client
                .fetch_page(account_id, page_size, cursor.as_deref())
                .await
                .map_err(|source| InventoryError::Fetch { page, source })?;

            snapshot.extend(batch.assets, batch.descriptions);

            if !batch.more || !load_all {
                break;
            }

            match batch.cursor {
                Some(next) => cursor = Some(next),
                None => return Err(InventoryError::MissingCursor { page }),
            }
        }

        info!(
            "Loaded inventory: {} descriptions, {} assets over {} page(s)",
            snapshot.descriptions.len(),
            snapshot.assets.len(),
            page
        );

        Ok(snapshot)
    }
}
