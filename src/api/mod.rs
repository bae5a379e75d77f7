//! Marketplace API: wire types and the snapshot client

pub mod client;
pub mod types;

pub use client::{ClientConfig, MarketClient, SnapshotProvider, API_BASE_URL};
pub use types::{Algorithm, CompetingOrder, Location};
