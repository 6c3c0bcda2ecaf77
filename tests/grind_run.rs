// tests/grind_run.rs
//
// Full runs of the engine against the simulated Steam account.

use goo_grinder::config::{default_config_template, Config};
use goo_grinder::engine::{Engine, RunSettings, RunSummary};
use goo_grinder::inventory::InventoryAggregator;
use goo_grinder::models::{AssetRecord, ConversionOutcome, InventorySnapshot, ItemDescription};
use goo_grinder::pipeline::ConversionPipeline;
use goo_grinder::retention::{Blacklist, GamePolicy, ItemPolicy, MatchMethod};
use goo_grinder::simulation::{demo_inventory, Fault, SimCall, SimulatedSteam};
use std::sync::Arc;

fn card(class_id: &str, name: &str, game: &str, app_id: u32) -> ItemDescription {
    ItemDescription {
        name: name.to_string(),
        type_long: format!("{} Trading Card", game),
        class_id: class_id.to_string(),
        instance_id: "0".to_string(),
        tags: vec![
            "Trading Card".to_string(),
            game.to_string(),
            "Trading Card".to_string(),
        ],
        app_id,
    }
}

fn open_blacklist() -> Blacklist {
    Blacklist {
        app_ids: vec![],
        item_types: vec![],
        game: GamePolicy::new(MatchMethod::Contains, vec![]),
        item: ItemPolicy::new(MatchMethod::Contains, vec![], false),
    }
}

fn engine(sim: &SimulatedSteam, blacklist: Blacklist, keep_count: usize) -> Engine {
    Engine::new(
        InventoryAggregator::new(Arc::new(sim.clone())),
        ConversionPipeline::new(Arc::new(sim.clone())),
        blacklist,
        RunSettings {
            account_id: "76561190000000000".to_string(),
            page_size: 5000,
            load_all: true,
            keep_count,
        },
    )
}

fn five_copies() -> InventorySnapshot {
    InventorySnapshot {
        assets: ["a1", "a2", "a3", "a4", "a5"]
            .iter()
            .map(|id| AssetRecord::new(*id, "scout", "0"))
            .collect(),
        descriptions: vec![card("scout", "Scout", "Team Fortress 2", 440)],
    }
}

#[tokio::test]
async fn test_pages_aggregate_in_arrival_order() {
    let first: Vec<AssetRecord> = (0..5000)
        .map(|i| AssetRecord::new(format!("p1-{}", i), "scout", "0"))
        .collect();
    let second: Vec<AssetRecord> = (0..3)
        .map(|i| AssetRecord::new(format!("p2-{}", i), "scout", "0"))
        .collect();
    let sim = SimulatedSteam::new()
        .with_page(first, vec![card("scout", "Scout", "Team Fortress 2", 440)])
        .with_page(second, vec![]);

    let snapshot = InventoryAggregator::new(Arc::new(sim))
        .load_inventory("76561190000000000", 5000, true)
        .await
        .unwrap();

    assert_eq!(snapshot.assets.len(), 5003);
    let ids: Vec<&str> = snapshot.assets.iter().map(|a| a.asset_id.as_str()).collect();
    assert_eq!(&ids[..2], &["p1-0", "p1-1"]);
    assert_eq!(&ids[4999..], &["p1-4999", "p2-0", "p2-1", "p2-2"]);
    assert_eq!(snapshot.descriptions.len(), 1);
}

#[tokio::test]
async fn test_keep_two_of_five_grinds_first_three() {
    let sim = SimulatedSteam::new().with_inventory(&five_copies(), 5000);

    let summary = engine(&sim, open_blacklist(), 2).run().await.unwrap();

    assert_eq!(sim.quoted(), vec!["a1", "a2", "a3"]);
    assert_eq!(sim.grinds(), vec!["a1", "a2", "a3"]);
    assert_eq!(summary.units_converted, 3);
    assert_eq!(summary.goo_total.as_deref(), Some("30"));
}

#[tokio::test]
async fn test_second_quote_failure_is_isolated() {
    let sim = SimulatedSteam::new()
        .with_inventory(&five_copies(), 5000)
        .with_goo_value("a1", "11")
        .with_goo_value("a3", "13")
        .fail_quote("a2", Fault::Transport);

    let item = card("scout", "Scout", "Team Fortress 2", 440);
    let asset_ids: Vec<String> = ["a1", "a2", "a3"].iter().map(|s| s.to_string()).collect();
    let outcomes = ConversionPipeline::new(Arc::new(sim.clone()))
        .convert(&item, &asset_ids, 0, &open_blacklist())
        .await;

    assert_eq!(
        outcomes[0],
        ConversionOutcome::Converted {
            asset_id: "a1".to_string(),
            quoted_value: "11".to_string(),
            new_total: "11".to_string(),
        }
    );
    assert!(matches!(outcomes[1], ConversionOutcome::Failed { .. }));
    assert_eq!(
        outcomes[2],
        ConversionOutcome::Converted {
            asset_id: "a3".to_string(),
            quoted_value: "13".to_string(),
            new_total: "24".to_string(),
        }
    );
}

#[tokio::test]
async fn test_retained_items_never_reach_the_goo_exchange() {
    let sim = SimulatedSteam::new().with_inventory(&five_copies(), 5000);
    let mut blacklist = open_blacklist();
    blacklist.item = ItemPolicy::new(MatchMethod::Levenshtein { threshold: 80.0 }, vec!["Scoot".to_string()], false);

    let summary = engine(&sim, blacklist, 0).run().await.unwrap();

    assert_eq!(summary.items_retained, 1);
    assert_eq!(summary.units_converted, 0);
    assert!(sim
        .calls()
        .iter()
        .all(|c| matches!(c, SimCall::FetchPage { .. })));
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let sim = SimulatedSteam::new().with_inventory(&five_copies(), 5000);
    let engine = Engine::new(
        InventoryAggregator::new(Arc::new(sim.clone())),
        ConversionPipeline::new(Arc::new(sim.clone())).with_dry_run(true),
        open_blacklist(),
        RunSettings {
            account_id: "76561190000000000".to_string(),
            page_size: 5000,
            load_all: true,
            keep_count: 1,
        },
    );

    let summary = engine.run().await.unwrap();

    assert_eq!(summary.units_skipped, 4);
    assert!(sim.quoted().is_empty());
    assert_eq!(sim.goo_total(), 0);
}

#[tokio::test]
async fn test_demo_inventory_with_template_blacklist() {
    let config_text = default_config_template()
        .replace(r#"session_id = """#, r#"session_id = "sess""#)
        .replace(r#"access_token = """#, r#"access_token = "tok""#);
    let config = Config::from_str(&config_text).unwrap();

    let sim = SimulatedSteam::new().with_inventory(&demo_inventory(), 5);
    let summary = engine(&sim, config.blacklist, config.run.keep_count)
        .run()
        .await
        .unwrap();

    // Only the Dota 2 card survives the blacklist; 3 copies, keep 1
    assert_eq!(sim.grinds(), vec!["1004", "1005"]);
    assert_eq!(
        summary,
        RunSummary {
            items_seen: 5,
            items_retained: 4,
            items_eligible: 1,
            units_converted: 2,
            units_failed: 0,
            units_skipped: 0,
            goo_total: Some("20".to_string()),
        }
    );
}
