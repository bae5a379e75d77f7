//! Integration tests for the order monitor
//!
//! These tests drive the throttled controller end to end against a
//! scripted snapshot provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use approx::assert_abs_diff_eq;
use async_trait::async_trait;

use hashbid::api::types::{Algorithm, CompetingOrder, Location};
use hashbid::api::SnapshotProvider;
use hashbid::{FetchError, OrderController, OrderControls, OrderSnapshot};

// =============================================================================
// Test Utilities
// =============================================================================

/// Snapshot provider that replays a fixed script of results and counts how
/// often it is called.
struct FakeProvider {
    script: Mutex<Vec<Result<Vec<CompetingOrder>, FetchError>>>,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(script: Vec<Result<Vec<CompetingOrder>, FetchError>>) -> Self {
        FakeProvider {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotProvider for &FakeProvider {
    async fn get_orders(
        &self,
        _location: Location,
        _algorithm: Algorithm,
        _alive_only: bool,
    ) -> Result<Vec<CompetingOrder>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            Ok(Vec::new())
        } else {
            script.remove(0)
        }
    }
}

fn competing_order(alive: bool, order_type: u8, workers: u32, price: f64) -> CompetingOrder {
    CompetingOrder {
        id: 0,
        order_type,
        price,
        limit_speed: 1.0,
        alive,
        workers,
    }
}

fn monitored_order() -> OrderSnapshot {
    OrderSnapshot {
        id: 1337,
        location: Location::Europe,
        algorithm: Algorithm::Scrypt,
    }
}

fn initial_controls() -> OrderControls {
    OrderControls {
        max_price: 0.0500,
        speed_limit: 1.5,
    }
}

const THROTTLE: u64 = 120;

// =============================================================================
// Throttling
// =============================================================================

#[tokio::test]
async fn idle_ticks_perform_no_fetch_and_no_mutation() {
    let provider = FakeProvider::new(vec![Ok(vec![competing_order(true, 0, 5, 0.03)])]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..(THROTTLE - 1) {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_eq!(provider.calls(), 0);
    assert_eq!(controls, initial_controls());
    assert_eq!(controller.ticks(), THROTTLE - 1);
}

#[tokio::test]
async fn evaluation_fires_exactly_once_per_throttle_window() {
    let provider = FakeProvider::new(vec![]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..(THROTTLE * 3) {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn short_throttle_periods_are_honored() {
    let provider = FakeProvider::new(vec![]);
    let mut controller = OrderController::new(&provider, 2);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..10 {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_eq!(provider.calls(), 5);
}

// =============================================================================
// Guards and failure degradation
// =============================================================================

#[tokio::test]
async fn absent_order_skips_fetch_and_mutation() {
    let provider = FakeProvider::new(vec![Ok(vec![competing_order(true, 0, 5, 0.03)])]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let mut controls = initial_controls();

    for _ in 0..THROTTLE {
        controller.handle_tick(None, &mut controls).await;
    }

    assert_eq!(provider.calls(), 0);
    assert_eq!(controls, initial_controls());
}

#[tokio::test]
async fn fetch_failure_leaves_controls_untouched() {
    let provider = FakeProvider::new(vec![Err(FetchError::Timeout)]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..THROTTLE {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_eq!(provider.calls(), 1);
    assert_eq!(controls, initial_controls());
}

#[tokio::test]
async fn loop_recovers_after_a_failed_cycle() {
    let provider = FakeProvider::new(vec![
        Err(FetchError::MalformedResponse("not JSON".to_string())),
        Ok(vec![
            competing_order(true, 0, 5, 0.02),
            competing_order(true, 0, 3, 0.05),
        ]),
    ]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    // First window fails, second succeeds.
    for _ in 0..(THROTTLE * 2) {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_eq!(provider.calls(), 2);
    assert_abs_diff_eq!(controls.max_price, 0.0150, epsilon = 1e-12);
}

#[tokio::test]
async fn fully_filtered_snapshot_holds_the_price() {
    let provider = FakeProvider::new(vec![Ok(vec![
        competing_order(false, 0, 5, 0.03),
        competing_order(true, 1, 5, 0.03),
        competing_order(true, 0, 0, 0.03),
    ])]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..THROTTLE {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_eq!(provider.calls(), 1);
    assert_eq!(controls, initial_controls());
}

#[tokio::test]
async fn zero_priced_market_holds_the_price() {
    let provider = FakeProvider::new(vec![Ok(vec![
        competing_order(true, 0, 4, 0.0),
        competing_order(true, 0, 2, 0.0),
    ])]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..THROTTLE {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_eq!(controls, initial_controls());
}

// =============================================================================
// Re-pricing
// =============================================================================

#[tokio::test]
async fn reference_snapshot_reprices_to_half_the_spread() {
    let provider = FakeProvider::new(vec![Ok(vec![
        competing_order(true, 0, 5, 0.02),
        competing_order(true, 0, 3, 0.05),
        competing_order(false, 0, 2, 0.09),
    ])]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..THROTTLE {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    // Dead order excluded, band [0.02, 0.05], floor(0.015 * 10000) / 10000.
    assert_abs_diff_eq!(controls.max_price, 0.0150, epsilon = 1e-12);
    assert_abs_diff_eq!(controls.speed_limit, 1.5);
}

#[tokio::test]
async fn speed_limit_is_never_changed_by_the_default_policy() {
    let provider = FakeProvider::new(vec![
        Ok(vec![
            competing_order(true, 0, 5, 0.02),
            competing_order(true, 0, 3, 0.08),
        ]),
        Ok(vec![
            competing_order(true, 0, 5, 0.01),
            competing_order(true, 0, 3, 0.09),
        ]),
    ]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..(THROTTLE * 2) {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_abs_diff_eq!(controls.speed_limit, 1.5);
}

#[tokio::test]
async fn evaluate_returns_a_pure_decision() {
    let provider = FakeProvider::new(vec![Ok(vec![
        competing_order(true, 0, 5, 0.02),
        competing_order(true, 0, 3, 0.05),
    ])]);
    let controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();

    let decision = controller.evaluate(&order).await.unwrap();
    assert_abs_diff_eq!(decision.new_max_price.unwrap(), 0.0150, epsilon = 1e-12);
    assert_eq!(decision.new_speed_limit, None);
}

#[tokio::test]
async fn evaluate_propagates_fetch_errors() {
    let provider = FakeProvider::new(vec![Err(FetchError::Api("bad request".to_string()))]);
    let controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();

    assert!(matches!(
        controller.evaluate(&order).await,
        Err(FetchError::Api(_))
    ));
}

#[tokio::test]
async fn new_price_is_never_negative() {
    // min == max collapses the spread to zero; the floor keeps it there.
    let provider = FakeProvider::new(vec![Ok(vec![
        competing_order(true, 0, 5, 0.04),
        competing_order(true, 0, 3, 0.04),
    ])]);
    let mut controller = OrderController::new(&provider, THROTTLE);
    let order = monitored_order();
    let mut controls = initial_controls();

    for _ in 0..THROTTLE {
        controller.handle_tick(Some(&order), &mut controls).await;
    }

    assert_abs_diff_eq!(controls.max_price, 0.0);
}
