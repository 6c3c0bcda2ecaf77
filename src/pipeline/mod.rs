// src/pipeline/mod.rs
//
// Grinds the surplus copies of an item into goo, one unit at a time.
// A failed unit is logged and skipped; it never stops the units after it.

use crate::models::{ConversionOutcome, ItemDescription};
use crate::retention::{Blacklist, RetentionDecision};
use crate::traits::SharedGooClient;
use log::{error, info, warn};

const DRY_RUN_REASON: &str = "dry run";

pub struct ConversionPipeline {
    client: SharedGooClient,
    dry_run: bool,
}

impl ConversionPipeline {
    pub fn new(client: SharedGooClient) -> Self {
        Self {
            client,
            dry_run: false,
        }
    }

    /// In dry-run mode surplus units are reported as skipped and nothing is
    /// sent to the remote.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Converts every copy of `item` beyond the first `keep_count`.
    ///
    /// The surplus is taken from the front of `asset_ids`, i.e. in the order
    /// the inventory listed them. Items the blacklist retains produce a
    /// `Skipped` outcome per surplus unit and no remote calls.
    pub async fn convert(
        &self,
        item: &ItemDescription,
        asset_ids: &[String],
        keep_count: usize,
        blacklist: &Blacklist,
    ) -> Vec<ConversionOutcome> {
        let surplus = asset_ids.len().saturating_sub(keep_count);
        let units = &asset_ids[..surplus];

        if let RetentionDecision::Retain(reason) = blacklist.evaluate(item) {
            warn!("[skip] {} reason={:?}", item.label(), reason.to_string());
            return units
                .iter()
                .map(|asset_id| ConversionOutcome::Skipped {
                    asset_id: asset_id.clone(),
                    reason: reason.to_string(),
                })
                .collect();
        }

        let mut outcomes = Vec::with_capacity(surplus);
        for asset_id in units {
            let outcome = if self.dry_run {
                info!("[dry-run] {} asset={} would be ground", item.label(), asset_id);
                ConversionOutcome::Skipped {
                    asset_id: asset_id.clone(),
                    reason: DRY_RUN_REASON.to_string(),
                }
            } else {
                self.convert_unit(item, asset_id).await
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Quote, then grind at the quoted value.
    async fn convert_unit(&self, item: &ItemDescription, asset_id: &str) -> ConversionOutcome {
        let failed = |reason: String| {
            error!("[failed] {} asset={} reason={:?}", item.label(), asset_id, reason);
            ConversionOutcome::Failed {
                asset_id: asset_id.to_string(),
                reason,
            }
        };

        let quote = match self.client.goo_value(item.app_id, asset_id).await {
            Ok(quote) => quote,
            Err(e) => return failed(format!("failed to get goo value: {}", e)),
        };
        if !quote.is_success() {
            return failed(format!(
                "goo value request returned success code {} ({})",
                quote.success,
                quote.message.as_deref().unwrap_or("no message")
            ));
        }

        let receipt = match self
            .client
            .grind_into_goo(item.app_id, asset_id, &quote.value)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => return failed(format!("failed to grind item into goo: {}", e)),
        };
        if !receipt.is_success() {
            return failed(format!("grind request returned success code {}", receipt.success));
        }

        info!(
            "[ground] {} asset={} goo_value={} goo_total={}",
            item.label(),
            asset_id,
            quote.value,
            receipt.goo_total
        );

        ConversionOutcome::Converted {
            asset_id: asset_id.to_string(),
            quoted_value: quote.value,
            new_total: receipt.goo_total,
        }
    }
}
