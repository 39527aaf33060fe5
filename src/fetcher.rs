//! Pagination loop that collects the full region registry.
//!
//! Pages are requested strictly one after another. Collection stops on the
//! first of:
//!
//! - a page with no items (exhaustion), which wins even if the reported total
//!   has not been reached
//! - the collected count reaching the reported `totalCount` (completion)
//!
//! Any error aborts the run before anything touches the disk.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{info, instrument, warn};

use crate::config::FetchConfig;
use crate::data_sources::{RegionSource, StanRegionClient};
use crate::error::{FetchError, Result};
use crate::model::RegionRecord;
use crate::storage::SnapshotStore;

/// Why the pagination loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A page came back empty.
    Exhausted,
    /// The collected count reached the reported total.
    Completed,
}

/// Records gathered by one pass over the listing.
#[derive(Debug, Clone)]
pub struct Collected {
    pub records: Vec<RegionRecord>,
    /// Last `totalCount` the API reported, if any non-empty page was seen.
    pub reported_total: Option<u64>,
    /// Number of page requests issued.
    pub pages: u32,
    pub termination: Termination,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub path: PathBuf,
    pub record_count: usize,
    pub reported_total: Option<u64>,
    pub pages: u32,
    pub termination: Termination,
}

/// Collects every region record from a source and stores the snapshot.
pub struct RegionDataFetcher<S> {
    source: S,
    store: SnapshotStore,
    max_pages: u32,
}

impl RegionDataFetcher<StanRegionClient> {
    /// Build a fetcher against the configured HTTP endpoint.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let client = StanRegionClient::from_config(config)?;
        let store = SnapshotStore::new(&config.output_dir);
        Ok(Self::new(client, store).with_max_pages(config.max_pages))
    }
}

impl<S: RegionSource> RegionDataFetcher<S> {
    pub fn new(source: S, store: SnapshotStore) -> Self {
        Self {
            source,
            store,
            max_pages: crate::config::DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Collect everything and write today's snapshot.
    pub async fn fetch_all(&self) -> Result<FetchOutcome> {
        self.fetch_all_on(Local::now().date_naive()).await
    }

    /// Collect everything and write the snapshot named for `date`.
    #[instrument(skip(self), fields(output_dir = %self.store.output_dir().display()))]
    pub async fn fetch_all_on(&self, date: NaiveDate) -> Result<FetchOutcome> {
        let collected = self.collect_all().await?;

        let path = self.store.write(date, &collected.records)?;
        info!(
            path = %path.display(),
            records = collected.records.len(),
            "Region snapshot saved"
        );

        Ok(FetchOutcome {
            path,
            record_count: collected.records.len(),
            reported_total: collected.reported_total,
            pages: collected.pages,
            termination: collected.termination,
        })
    }

    /// Run the pagination loop without writing anything.
    pub async fn collect_all(&self) -> Result<Collected> {
        let mut records: Vec<RegionRecord> = Vec::new();
        let mut reported_total = None;
        let mut page_no: u32 = 1;

        loop {
            if page_no > self.max_pages {
                return Err(FetchError::parse(
                    page_no,
                    format!(
                        "pagination did not terminate within {} pages ({} records collected)",
                        self.max_pages,
                        records.len()
                    ),
                ));
            }

            let page = self.source.fetch_page(page_no).await?;

            if page.is_empty() {
                if let Some(total) = reported_total.filter(|&t| (records.len() as u64) < t) {
                    warn!(
                        page = page_no,
                        collected = records.len(),
                        total,
                        "Empty page before reported total; stopping"
                    );
                } else {
                    info!(page = page_no, "Empty page; listing exhausted");
                }
                return Ok(Collected {
                    records,
                    reported_total,
                    pages: page_no,
                    termination: Termination::Exhausted,
                });
            }

            records.extend(page.items);
            reported_total = Some(page.total_count);

            info!(
                page = page_no,
                collected = records.len(),
                total = page.total_count,
                "Collected region page"
            );

            if records.len() as u64 >= page.total_count {
                return Ok(Collected {
                    records,
                    reported_total,
                    pages: page_no,
                    termination: Termination::Completed,
                });
            }

            page_no += 1;
        }
    }
}
