//! Regionfetch - a snapshot collector for the national administrative region code registry.
//!
//! # Overview
//!
//! The registry is published as a paginated open-data listing. Regionfetch
//! walks it page by page, accumulates every record in API order and writes the
//! whole collection to `region_<YYYYMMDD>.json` in one step.
//!
//! # Guarantees
//!
//! - Pages are fetched sequentially; nothing is retried.
//! - Any transport, parse or filesystem failure aborts the run and leaves no
//!   snapshot behind.
//! - Records are passed through untouched.
//!
//! # Modules
//!
//! - [`config`]: Environment-driven configuration
//! - [`data_sources`]: HTTP client for the listing API
//! - [`fetcher`]: Pagination loop and run orchestration
//! - [`model`]: Request parameters and page envelopes
//! - [`storage`]: Dated snapshot files

pub mod config;
pub mod data_sources;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod storage;

pub use error::{FetchError, Result};
pub use fetcher::{FetchOutcome, RegionDataFetcher, Termination};
