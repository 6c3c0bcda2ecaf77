// src/engine/mod.rs

use crate::errors::InventoryError;
use crate::inventory::InventoryAggregator;
use crate::models::{ConversionOutcome, InventorySnapshot, ItemDescription};
use crate::pipeline::ConversionPipeline;
use crate::retention::{Blacklist, RetainReason, RetentionDecision};
use log::{error, info};
use serde::Serialize;

/// What a run needs to know about the account and how much to keep.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub account_id: String,
    pub page_size: u32,
    pub load_all: bool,
    /// Copies of each item that are never ground
    pub keep_count: usize,
}

/// Tally of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub items_seen: usize,
    pub items_retained: usize,
    pub items_eligible: usize,
    pub units_converted: usize,
    pub units_failed: usize,
    pub units_skipped: usize,
    /// Goo total reported by the last successful grind
    pub goo_total: Option<String>,
}

impl RunSummary {
    fn record(&mut self, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted { new_total, .. } => {
                self.units_converted += 1;
                self.goo_total = Some(new_total.clone());
            }
            ConversionOutcome::Skipped { .. } => self.units_skipped += 1,
            ConversionOutcome::Failed { .. } => self.units_failed += 1,
        }
    }
}

/// The Engine runs one pass: aggregate the inventory, filter it through the
/// blacklist and grind the surplus of whatever survives.
///
/// Everything runs sequentially; each remote call finishes before the next
/// one starts.
pub struct Engine {
    aggregator: InventoryAggregator,
    pipeline: ConversionPipeline,
    blacklist: Blacklist,
    settings: RunSettings,
}

impl Engine {
    pub fn new(
        aggregator: InventoryAggregator,
        pipeline: ConversionPipeline,
        blacklist: Blacklist,
        settings: RunSettings,
    ) -> Self {
        Self {
            aggregator,
            pipeline,
            blacklist,
            settings,
        }
    }

    /// Loads the inventory and processes it. Only aggregation can fail; unit
    /// failures are counted in the summary.
    pub async fn run(&self) -> Result<RunSummary, InventoryError> {
        let snapshot = self
            .aggregator
            .load_inventory(
                &self.settings.account_id,
                self.settings.page_size,
                self.settings.load_all,
            )
            .await?;

        let summary = self.process(&snapshot).await;
        info!("Finished: {:?}", summary);
        Ok(summary)
    }

    /// Applies the blacklist and grinds eligible items of an already loaded
    /// snapshot.
    pub async fn process(&self, snapshot: &InventorySnapshot) -> RunSummary {
        let mut summary = RunSummary::default();

        for item in &snapshot.descriptions {
            summary.items_seen += 1;

            match self.blacklist.evaluate(item) {
                RetentionDecision::Retain(reason) => {
                    summary.items_retained += 1;
                    if reason == RetainReason::TooFewTags {
                        error!("{}", retain_line(item, reason));
                    } else {
                        info!("{}", retain_line(item, reason));
                    }
                    continue;
                }
                RetentionDecision::Convert => summary.items_eligible += 1,
            }

            let asset_ids = snapshot.asset_ids_for(item);
            let outcomes = self
                .pipeline
                .convert(item, &asset_ids, self.settings.keep_count, &self.blacklist)
                .await;

            for outcome in &outcomes {
                summary.record(outcome);
            }
        }

        summary
    }
}

/// Log line for a retained item. Items with too few tags have no game or
/// type to report, so only the name, appid and tag count are shown.
fn retain_line(item: &ItemDescription, reason: RetainReason) -> String {
    match reason {
        RetainReason::TooFewTags => format!(
            "[retain] item={:?} appid={} tags={} reason=\"{}\"",
            item.name,
            item.app_id,
            item.tags.len(),
            reason
        ),
        _ => format!("[retain] {} appid={} reason=\"{}\"", item.label(), item.app_id, reason),
    }
}
