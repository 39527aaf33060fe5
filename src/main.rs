//! Regionfetch - collects the administrative region code registry into a dated JSON snapshot.
//!
//! # Configuration
//!
//! - `REGION_SERVICE_KEY` - API credential (required)
//! - `REGION_API_URL` - listing endpoint
//! - `REGION_OUTPUT_DIR` - snapshot directory (default `assets/data`)
//! - `REGION_PAGE_SIZE` - rows per page (default 1000)
//! - `REGION_TIMEOUT_SECS` - per-request timeout (default 30)
//! - `REGION_MAX_PAGES` - page limit for one run (default 1000)

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use regionfetch::RegionDataFetcher;
use regionfetch::config::FetchConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("regionfetch=info".parse()?))
        .init();

    let config = FetchConfig::from_env()?;

    info!(
        url = %config.api_url,
        service_key = %config.masked_service_key(),
        page_size = config.page_size,
        output_dir = %config.output_dir.display(),
        "Starting region code collection"
    );

    let fetcher = RegionDataFetcher::from_config(&config)?;

    match fetcher.fetch_all().await {
        Ok(outcome) => {
            info!(
                path = %outcome.path.display(),
                records = outcome.record_count,
                pages = outcome.pages,
                termination = ?outcome.termination,
                "Region code collection finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Region code collection failed");
            Err(e.into())
        }
    }
}
