#![no_std]

//! Shared contract surface for the yield strategy adapters.
//!
//! The owning vault never talks to a yield backend directly. It holds the
//! address of an adapter contract and drives it through [`StrategyClient`];
//! every adapter implements the same [`Strategy`] trait, enforces the same
//! guard thresholds and emits the same event vocabulary, so backends can be
//! swapped or added without any caller-side change.

mod error;
mod interface;

pub mod events;
pub mod guards;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use error::StrategyError;
pub use interface::{
    Strategy, StrategyClient, StrategyMetadata, TieredMarket, TieredMarketClient, VaultBackend,
    VaultBackendClient,
};
