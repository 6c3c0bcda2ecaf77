// src/simulation/steam.rs
//
// In-memory stand-in for Steam Community. Serves a fixed inventory in pages,
// quotes and grinds assets, records every call and can be told to fail.

use crate::errors::SteamError;
use crate::models::{AssetRecord, GooQuote, GrindReceipt, InventoryPage, InventorySnapshot, ItemDescription};
use crate::traits::{GooClient, InventoryClient};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

const DEFAULT_GOO_VALUE: &str = "10";

/// A remote call observed by the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCall {
    FetchPage { cursor: Option<String> },
    Quote { asset_id: String },
    Grind { asset_id: String, expected_value: String },
}

/// How a scripted call should misbehave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The call errors before any reply is decoded
    Transport,
    /// A reply arrives with this success code
    Code(i32),
}

#[derive(Debug, Default)]
struct SimState {
    pages: Vec<(Vec<AssetRecord>, Vec<ItemDescription>)>,
    failing_pages: HashSet<usize>,
    goo_values: HashMap<String, String>,
    quote_faults: HashMap<String, Fault>,
    grind_faults: HashMap<String, Fault>,
    ground: HashSet<String>,
    goo_total: u64,
    calls: Vec<SimCall>,
}

/// Simulated Steam account.
///
/// Page cursors are the page index as a string. The requested page size is
/// ignored; pages are laid out when the inventory is loaded.
#[derive(Clone, Default)]
pub struct SimulatedSteam {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedSteam {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page with exactly these records.
    pub fn with_page(self, assets: Vec<AssetRecord>, descriptions: Vec<ItemDescription>) -> Self {
        self.state.lock().unwrap().pages.push((assets, descriptions));
        self
    }

    /// Splits `snapshot` into pages of `page_size` assets. Each description is
    /// served with the first page holding one of its assets.
    pub fn with_inventory(self, snapshot: &InventorySnapshot, page_size: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let mut emitted: HashSet<(String, String)> = HashSet::new();

            for chunk in snapshot.assets.chunks(page_size.max(1)) {
                let descriptions = snapshot
                    .descriptions
                    .iter()
                    .filter(|d| chunk.iter().any(|a| d.describes(a)))
                    .filter(|d| emitted.insert((d.class_id.clone(), d.instance_id.clone())))
                    .cloned()
                    .collect();
                state.pages.push((chunk.to_vec(), descriptions));
            }
        }
        self
    }

    /// Makes the fetch of page `index` (0-based) fail.
    pub fn fail_page(self, index: usize) -> Self {
        self.state.lock().unwrap().failing_pages.insert(index);
        self
    }

    pub fn with_goo_value(self, asset_id: &str, value: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .goo_values
            .insert(asset_id.to_string(), value.to_string());
        self
    }

    pub fn fail_quote(self, asset_id: &str, fault: Fault) -> Self {
        self.state
            .lock()
            .unwrap()
            .quote_faults
            .insert(asset_id.to_string(), fault);
        self
    }

    pub fn fail_grind(self, asset_id: &str, fault: Fault) -> Self {
        self.state
            .lock()
            .unwrap()
            .grind_faults
            .insert(asset_id.to_string(), fault);
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<SimCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Asset IDs that received a quote request, in order.
    pub fn quoted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SimCall::Quote { asset_id } => Some(asset_id),
                _ => None,
            })
            .collect()
    }

    /// Asset IDs that received a grind request, in order.
    pub fn grinds(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SimCall::Grind { asset_id, .. } => Some(asset_id),
                _ => None,
            })
            .collect()
    }

    pub fn goo_total(&self) -> u64 {
        self.state.lock().unwrap().goo_total
    }
}

fn apply_fault(fault: Option<&Fault>) -> Result<Option<i32>, SteamError> {
    match fault {
        Some(Fault::Transport) => Err(SteamError::Transport("simulated timeout".to_string())),
        Some(Fault::Code(code)) => Ok(Some(*code)),
        None => Ok(None),
    }
}

#[async_trait]
impl InventoryClient for SimulatedSteam {
    async fn fetch_page(
        &self,
        _account_id: &str,
        _page_size: u32,
        cursor: Option<&str>,
    ) -> Result<InventoryPage, SteamError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(SimCall::FetchPage {
            cursor: cursor.map(str::to_string),
        });

        let index = match cursor {
            None => 0,
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| SteamError::Status(400))?,
        };

        if state.failing_pages.contains(&index) {
            return Err(SteamError::Transport(format!("simulated failure on page {}", index)));
        }

        let page_count = state.pages.len();
        let (assets, descriptions) = match state.pages.get(index) {
            Some(page) => page.clone(),
            None if index == 0 => (Vec::new(), Vec::new()),
            None => return Err(SteamError::Status(400)),
        };

        let more = index + 1 < page_count;
        Ok(InventoryPage {
            assets,
            descriptions,
            cursor: more.then(|| (index + 1).to_string()),
            more,
        })
    }
}

#[async_trait]
impl GooClient for SimulatedSteam {
    async fn goo_value(&self, _app_id: u32, asset_id: &str) -> Result<GooQuote, SteamError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(SimCall::Quote {
            asset_id: asset_id.to_string(),
        });

        if let Some(code) = apply_fault(state.quote_faults.get(asset_id))? {
            return Ok(GooQuote {
                value: String::new(),
                message: Some("simulated rejection".to_string()),
                success: code,
            });
        }

        let value = state
            .goo_values
            .get(asset_id)
            .cloned()
            .unwrap_or_else(|| DEFAULT_GOO_VALUE.to_string());

        Ok(GooQuote {
            value,
            message: None,
            success: GooQuote::SUCCESS,
        })
    }

    async fn grind_into_goo(
        &self,
        _app_id: u32,
        asset_id: &str,
        expected_value: &str,
    ) -> Result<GrindReceipt, SteamError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(SimCall::Grind {
            asset_id: asset_id.to_string(),
            expected_value: expected_value.to_string(),
        });

        let rejected = |state: &SimState, code: i32| GrindReceipt {
            goo_total: state.goo_total.to_string(),
            success: code,
        };

        if let Some(code) = apply_fault(state.grind_faults.get(asset_id))? {
            return Ok(rejected(&*state, code));
        }

        let current = state
            .goo_values
            .get(asset_id)
            .map(String::as_str)
            .unwrap_or(DEFAULT_GOO_VALUE);
        let value = match current.parse::<u64>() {
            Ok(v) if current == expected_value => v,
            _ => return Ok(rejected(&*state, 2)),
        };

        if !state.ground.insert(asset_id.to_string()) {
            return Ok(rejected(&*state, 2));
        }
        state.goo_total += value;

        Ok(GrindReceipt {
            goo_total: state.goo_total.to_string(),
            success: GrindReceipt::SUCCESS,
        })
    }
}

// =============================================================================
// Demo Inventory
// =============================================================================

fn demo_item(
    class_id: &str,
    name: &str,
    type_long: &str,
    tags: &[&str],
    app_id: u32,
) -> ItemDescription {
    ItemDescription {
        name: name.to_string(),
        type_long: type_long.to_string(),
        class_id: class_id.to_string(),
        instance_id: "0".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        app_id,
    }
}

/// A small mixed inventory used by the CLI demo mode.
pub fn demo_inventory() -> InventorySnapshot {
    let descriptions = vec![
        demo_item(
            "100",
            "Heavy",
            "Team Fortress 2 Trading Card",
            &["Trading Card", "Team Fortress 2", "Trading Card"],
            440,
        ),
        demo_item(
            "200",
            "Pudge",
            "Dota 2 Trading Card",
            &["Trading Card", "Dota 2", "Trading Card"],
            570,
        ),
        demo_item(
            "300",
            ":cake:",
            "Portal 2 Emoticon",
            &["Emoticon", "Portal 2", "Emoticon"],
            620,
        ),
        demo_item(
            "400",
            "Aperture Lab",
            "Portal 2 Profile Background",
            &["Profile Background", "Portal 2", "Profile Background"],
            620,
        ),
        demo_item("500", "Mystery Item", "Untagged", &["Steam", "Unknown"], 753),
    ];

    let mut assets = Vec::new();
    let mut next_id = 1_000u64;
    for (class_id, copies) in [("100", 4), ("200", 3), ("300", 2), ("400", 3), ("500", 2)] {
        for _ in 0..copies {
            assets.push(AssetRecord::new(next_id.to_string(), class_id, "0"));
            next_id += 1;
        }
    }

    InventorySnapshot {
        assets,
        descriptions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pages_follow_cursors() {
        let sim = SimulatedSteam::new().with_inventory(&demo_inventory(), 5);

        let first = sim.fetch_page("me", 5, None).await.unwrap();
        assert_eq!(first.assets.len(), 5);
        assert!(first.more);

        let second = sim
            .fetch_page("me", 5, first.cursor.as_deref())
            .await
            .unwrap();
        assert_eq!(second.assets[0].asset_id, "1005");
    }

    #[tokio::test]
    async fn test_descriptions_served_once() {
        let sim = SimulatedSteam::new().with_inventory(&demo_inventory(), 2);
        let mut cursor = None;
        let mut seen = Vec::new();
        loop {
            let page = sim.fetch_page("me", 2, cursor.as_deref()).await.unwrap();
            seen.extend(page.descriptions.into_iter().map(|d| d.class_id));
            if !page.more {
                break;
            }
            cursor = page.cursor;
        }
        assert_eq!(seen, vec!["100", "200", "300", "400", "500"]);
    }

    #[tokio::test]
    async fn test_grind_requires_matching_value() {
        let sim = SimulatedSteam::new().with_goo_value("1", "40");

        let receipt = sim.grind_into_goo(440, "1", "39").await.unwrap();
        assert!(!receipt.is_success());

        let receipt = sim.grind_into_goo(440, "1", "40").await.unwrap();
        assert!(receipt.is_success());
        assert_eq!(receipt.goo_total, "40");

        // Already ground
        let receipt = sim.grind_into_goo(440, "1", "40").await.unwrap();
        assert!(!receipt.is_success());
        assert_eq!(sim.goo_total(), 40);
    }

    #[tokio::test]
    async fn test_faults() {
        let sim = SimulatedSteam::new()
            .fail_quote("1", Fault::Transport)
            .fail_quote("2", Fault::Code(8));

        assert!(sim.goo_value(440, "1").await.is_err());
        assert_eq!(sim.goo_value(440, "2").await.unwrap().success, 8);
        assert!(sim.goo_value(440, "3").await.unwrap().is_success());
        assert_eq!(sim.quoted(), vec!["1", "2", "3"]);
    }
}
