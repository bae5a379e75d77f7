//! Hashpower order price monitor
//!
//! Polls the competing orders for a (location, algorithm) market pair on a
//! throttled cadence and re-prices a standing order to half the spread of
//! the qualifying price band.

pub mod api;
pub mod band;
pub mod config;
pub mod controller;
pub mod error;

pub use band::{price_band, target_price, PriceBand};
pub use config::Config;
pub use controller::{Decision, OrderController, OrderControls, OrderSnapshot};
pub use error::{ConfigError, FetchError};
