//! Price band aggregation
//!
//! Reduces a market snapshot to the [min, max] price range of qualifying
//! competing orders, and derives the target price from that band.

use crate::api::types::CompetingOrder;

/// Initial value of the running minimum. Any qualifying order priced at or
/// above this leaves the minimum untouched, which folds into the absent
/// check below.
const MIN_SENTINEL: f64 = 10.0;

/// Price range over the qualifying subset of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
}

impl PriceBand {
    /// Spread between the highest and lowest qualifying price.
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

/// Whether an order participates in the band.
///
/// Standard orders only (`type == 0`), and only while alive with at least
/// one worker on them.
fn qualifies(order: &CompetingOrder) -> bool {
    order.alive && order.order_type == 0 && order.workers > 0
}

/// Compute the price band of a snapshot, or `None` when no order qualifies.
///
/// The fold starts from `max = 0` and `min = 10`; a result where either
/// sentinel survives is reported as absent. A snapshot whose qualifying
/// prices are all exactly zero therefore also comes back `None` — this is
/// longstanding observable behavior and is pinned by test, so it must not
/// be "corrected" to a `{0, 0}` band.
pub fn price_band(orders: &[CompetingOrder]) -> Option<PriceBand> {
    let mut min = MIN_SENTINEL;
    let mut max = 0.0;

    for order in orders.iter().filter(|o| qualifies(o)) {
        if order.price > max {
            max = order.price;
        }
        if order.price < min {
            min = order.price;
        }
    }

    if max == 0.0 || min == MIN_SENTINEL {
        return None;
    }

    Some(PriceBand { min, max })
}

/// Target price for the monitored order: half the band spread, truncated
/// (not rounded) to four decimal places.
pub fn target_price(band: &PriceBand) -> f64 {
    (band.spread() / 2.0 * 10_000.0).floor() / 10_000.0
}
