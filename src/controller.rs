//! Throttled order re-pricing loop
//!
//! `OrderController::handle_tick` is invoked on a fast external cadence.
//! It self-throttles through a per-order tick counter so that the expensive
//! work — one snapshot fetch plus aggregation — runs only once every
//! `throttle_period` ticks. When a pass fires, the resulting `Decision` is
//! applied to the caller-owned order controls; every failure along the way
//! degrades to a no-op for that cycle and never reaches the scheduler.

use tracing::{debug, info, warn};

use crate::api::types::{Algorithm, Location};
use crate::api::SnapshotProvider;
use crate::band;
use crate::error::FetchError;

/// Read-only view of the monitored order.
///
/// Supplied by the caller on every tick; the controller never mutates it
/// and never retains it across ticks.
#[derive(Debug, Clone, Copy)]
pub struct OrderSnapshot {
    pub id: u64,
    pub location: Location,
    pub algorithm: Algorithm,
}

/// Caller-owned mutable order state the controller's decisions act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderControls {
    pub max_price: f64,
    pub speed_limit: f64,
}

/// Per-order tick counter. One instance per independently scheduled order;
/// wrapping is irrelevant since only the modulus is observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlState {
    ticks: u64,
}

/// Outcome of one evaluation pass.
///
/// `None` fields mean "hold the current value". The default policy never
/// sets `new_speed_limit`; it exists as the extension point for custom
/// policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub new_max_price: Option<f64>,
    pub new_speed_limit: Option<f64>,
}

impl Decision {
    /// A decision that changes nothing.
    pub fn hold() -> Self {
        Decision {
            new_max_price: None,
            new_speed_limit: None,
        }
    }

    /// Apply the decision to the caller's order controls.
    pub fn apply(&self, controls: &mut OrderControls) {
        if let Some(price) = self.new_max_price {
            controls.max_price = price;
        }
        if let Some(limit) = self.new_speed_limit {
            controls.speed_limit = limit;
        }
    }
}

/// Throttled control loop for a single monitored order.
pub struct OrderController<P> {
    provider: P,
    state: ControlState,
    throttle_period: u64,
}

impl<P: SnapshotProvider> OrderController<P> {
    /// Panics if `throttle_period` is zero. The CLI path rejects that via
    /// `Config::validate` before a controller is ever built; direct library
    /// callers get the same setup-time failure instead of a
    /// remainder-by-zero on the first tick.
    pub fn new(provider: P, throttle_period: u64) -> Self {
        assert!(throttle_period > 0, "throttle_period must be non-zero");
        OrderController {
            provider,
            state: ControlState::default(),
            throttle_period,
        }
    }

    /// Number of ticks delivered so far.
    pub fn ticks(&self) -> u64 {
        self.state.ticks
    }

    /// Process one external tick.
    ///
    /// Increments the tick counter and returns immediately — no I/O, no
    /// mutation — unless the counter has reached the throttle threshold.
    /// When a pass fires it fetches the competing orders, aggregates them
    /// into a price band and applies the resulting decision to `controls`.
    /// Absent order state, fetch failures and empty bands all leave
    /// `controls` untouched.
    pub async fn handle_tick(
        &mut self,
        order: Option<&OrderSnapshot>,
        controls: &mut OrderControls,
    ) {
        self.state.ticks += 1;
        if self.state.ticks % self.throttle_period != 0 {
            return;
        }

        // The order may not have been created yet.
        let Some(order) = order else {
            return;
        };

        let decision = match self.evaluate(order).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!("Skipping re-price of order #{}: {}", order.id, e);
                return;
            }
        };

        if let Some(price) = decision.new_max_price {
            info!("Adjusting order #{} maximal price to {:.4}", order.id, price);
        }
        decision.apply(controls);
    }

    /// One evaluation pass: fetch, aggregate, decide. Pure apart from the
    /// snapshot fetch, which makes it the natural seam for tests.
    pub async fn evaluate(&self, order: &OrderSnapshot) -> Result<Decision, FetchError> {
        let orders = self
            .provider
            .get_orders(order.location, order.algorithm, true)
            .await?;

        match band::price_band(&orders) {
            Some(band) => Ok(Decision {
                new_max_price: Some(band::target_price(&band)),
                new_speed_limit: None,
            }),
            None => {
                debug!(
                    "No qualifying competing orders for order #{}, holding price",
                    order.id
                );
                Ok(Decision::hold())
            }
        }
    }
}
