// src/main.rs
//
// Grinds surplus Steam inventory items into goo. The inventory is loaded,
// filtered through the configured blacklist, and every copy beyond the keep
// count is quoted and ground, one at a time.

use anyhow::{bail, Context, Result};
use clap::Parser;
use goo_grinder::config::{default_config_template, Config};
use goo_grinder::connectors::steam::{SteamCommunity, DEFAULT_REQUEST_TIMEOUT};
use goo_grinder::engine::{Engine, RunSettings, RunSummary};
use goo_grinder::inventory::InventoryAggregator;
use goo_grinder::logging;
use goo_grinder::pipeline::ConversionPipeline;
use goo_grinder::simulation::{demo_inventory, SimulatedSteam};
use log::{info, warn};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "goo-grinder")]
#[command(about = "Grind surplus Steam inventory items into goo")]
struct Args {
    /// Mode of operation: live or demo
    #[arg(long, default_value = "live")]
    mode: String,

    /// Path to configuration file (TOML)
    #[arg(long, short)]
    config: Option<String>,

    /// Report what would be ground without grinding anything
    #[arg(long)]
    dry_run: bool,

    /// Override the configured keep count
    #[arg(long)]
    keep_count: Option<usize>,

    /// Print a default configuration file
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if args.generate_config {
        println!("{}", default_config_template());
        return;
    }

    let result = match args.mode.as_str() {
        "live" => run_live_mode(&args).await,
        "demo" => run_demo_mode(&args).await,
        _ => {
            eprintln!("Unknown mode: {}. Use: live or demo", args.mode);
            std::process::exit(1);
        }
    };

    match result {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to format summary: {}", e),
        },
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

// =============================================================================
// Live Mode: grind against steamcommunity.com
// =============================================================================

async fn run_live_mode(args: &Args) -> Result<RunSummary> {
    let Some(path) = &args.config else {
        bail!("No config file specified. Use --config <path> (or --generate-config for a template)");
    };

    let mut config = Config::from_file(path).context("Failed to load config")?;
    config.run.dry_run |= args.dry_run;
    if let Some(keep_count) = args.keep_count {
        config.run.keep_count = keep_count;
    }

    logging::init(config.run.log_level.as_deref(), config.run.log_file.as_deref())
        .context("Failed to open log file")?;

    for field in config.blacklist.empty_fields() {
        warn!("Blacklist field `{}` is empty, is that intended?", field);
    }

    let http_client =
        SteamCommunity::http_client(DEFAULT_REQUEST_TIMEOUT).context("Failed to build HTTP client")?;
    let steam = SteamCommunity::new(http_client, config.account.clone()).shared();

    let settings = config.run_settings();
    info!(
        "Grinding inventory of {} (keep {}, load all: {}, dry run: {})",
        settings.account_id, settings.keep_count, settings.load_all, config.run.dry_run
    );

    let engine = Engine::new(
        InventoryAggregator::new(steam.clone()),
        ConversionPipeline::new(steam).with_dry_run(config.run.dry_run),
        config.blacklist,
        settings,
    );

    engine.run().await.context("Failed to load inventory")
}

// =============================================================================
// Demo Mode: grind a simulated inventory
// =============================================================================

async fn run_demo_mode(args: &Args) -> Result<RunSummary> {
    logging::init(None, None).context("Failed to initialize logging")?;
    info!("Starting demo mode against a simulated inventory...");

    // The template's blacklist, without its placeholder credentials
    let template: Config =
        toml::from_str(default_config_template()).context("Failed to parse config template")?;

    let page_size = 5;
    let steam = Arc::new(SimulatedSteam::new().with_inventory(&demo_inventory(), page_size));

    let engine = Engine::new(
        InventoryAggregator::new(steam.clone()),
        ConversionPipeline::new(steam).with_dry_run(args.dry_run),
        template.blacklist,
        RunSettings {
            account_id: "demo".to_string(),
            page_size: page_size as u32,
            load_all: true,
            keep_count: args.keep_count.unwrap_or(template.run.keep_count),
        },
    );

    engine.run().await.context("Failed to load simulated inventory")
}
