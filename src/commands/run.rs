//! Run command — the monitoring loop
//!
//! Drives the order controller on the configured fast tick cadence until
//! interrupted. The loop owns the order view and its mutable controls; the
//! controller mutates the controls through applied decisions only.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{error, info};

use hashbid::api::{ClientConfig, MarketClient};
use hashbid::{Config, OrderController, OrderControls, OrderSnapshot};

pub fn run(config_path: String) -> Result<()> {
    dotenv::dotenv().ok();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run_async(config_path))
}

async fn run_async(config_path: String) -> Result<()> {
    let config = Config::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;
    config.validate().context("Invalid configuration")?;

    info!("Monitoring order #{}", config.order.id);
    info!(
        "Market: {} / {}",
        config.order.location, config.order.algorithm
    );
    info!(
        "Cadence: tick every {:?}, evaluation every {:?} ({} ticks)",
        config.monitor.tick_interval(),
        config.monitor.effective_interval(),
        config.monitor.throttle_period
    );

    let client_config = ClientConfig::default().with_timeout(config.api.timeout());
    let client = MarketClient::with_config(config.api.api_id, &config.api.api_key, client_config);

    let order = OrderSnapshot {
        id: config.order.id,
        location: config.order.location,
        algorithm: config.order.algorithm,
    };
    let mut controls = OrderControls {
        max_price: config.order.initial_max_price,
        speed_limit: config.order.initial_speed_limit,
    };
    let mut controller = OrderController::new(client, config.monitor.throttle_period);

    let shutdown_flag = Arc::new(AtomicBool::new(false));
    let shutdown_flag_clone = shutdown_flag.clone();
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating shutdown...");
                shutdown_flag_clone.store(true, Ordering::SeqCst);
                let _ = shutdown_tx.send(()).await;
            }
            Err(e) => {
                error!("Error setting up signal handler: {}", e);
            }
        }
    });

    let mut tick_interval = interval(config.monitor.tick_interval());

    info!("Starting monitor loop...");

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                if shutdown_flag.load(Ordering::SeqCst) {
                    break;
                }
                controller.handle_tick(Some(&order), &mut controls).await;
            }
            _ = shutdown_rx.recv() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!(
        "Monitor stopped after {} ticks; final max price {:.4}, speed limit {:.2}",
        controller.ticks(),
        controls.max_price,
        controls.speed_limit
    );
    Ok(())
}
