//! Snapshot command — one-shot market dump
//!
//! Fetches the competing orders for the configured market pair once and
//! prints them with the derived price band and target price. Useful for
//! checking what the monitor would do before letting it run.

use anyhow::{Context, Result};
use tracing::info;

use hashbid::api::{ClientConfig, MarketClient, SnapshotProvider};
use hashbid::{band, Config};

pub fn run(config_path: String, all: bool) -> Result<()> {
    dotenv::dotenv().ok();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run_async(config_path, all))
}

async fn run_async(config_path: String, all: bool) -> Result<()> {
    let config = Config::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;
    config.validate().context("Invalid configuration")?;

    let client_config = ClientConfig::default().with_timeout(config.api.timeout());
    let client = MarketClient::with_config(config.api.api_id, &config.api.api_key, client_config);

    let orders = client
        .get_orders(config.order.location, config.order.algorithm, !all)
        .await
        .context("Failed to fetch competing orders")?;

    info!(
        "{} competing orders for {} / {}",
        orders.len(),
        config.order.location,
        config.order.algorithm
    );

    println!(
        "{:>10}  {:>5}  {:>8}  {:>8}  {:>7}  {:>8}",
        "id", "type", "price", "limit", "workers", "alive"
    );
    for order in &orders {
        println!(
            "{:>10}  {:>5}  {:>8.4}  {:>8.2}  {:>7}  {:>8}",
            order.id, order.order_type, order.price, order.limit_speed, order.workers, order.alive
        );
    }

    match band::price_band(&orders) {
        Some(band) => {
            println!();
            println!("price band: [{:.4}, {:.4}]", band.min, band.max);
            println!("target price: {:.4}", band::target_price(&band));
        }
        None => {
            println!();
            println!("no qualifying competing orders; the monitor would hold the price");
        }
    }

    Ok(())
}
