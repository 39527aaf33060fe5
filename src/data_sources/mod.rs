//! Upstream data sources for the region registry.
//!
//! # Data Sources
//!
//! - [`stan_region`]: the standard administrative region code listing
//!
//! Sources are reached through the [`RegionSource`] trait so the fetch loop
//! can run against any paginated provider.

pub mod stan_region;

pub use stan_region::{RegionSource, StanRegionClient};
