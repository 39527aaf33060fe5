//! Standard region code (StanReginCd) API client.
//!
//! The listing is served by the public data portal as a paginated JSON
//! endpoint. Every page is requested with the same service key, page size and
//! "all regions" flag; only `pageNo` advances.
//!
//! # Rate Limits
//!
//! Enforced by the portal per service key. No client-side limiting is applied.

use tracing::debug;

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::model::{PageRequest, PageResponse};

/// Something that can hand out pages of the region listing.
pub trait RegionSource {
    /// Fetch and parse a single 1-indexed page.
    fn fetch_page(&self, page_no: u32) -> impl Future<Output = Result<PageResponse>>;
}

/// Client for querying the standard region code listing.
#[derive(Clone)]
pub struct StanRegionClient {
    client: reqwest::Client,
    base_url: String,
    request: PageRequest,
}

impl StanRegionClient {
    /// Create a client with a custom base URL (for testing).
    ///
    /// # Arguments
    ///
    /// * `service_key` - Credential issued by the data portal, raw or percent-encoded.
    /// * `page_size` - Rows per page (`numOfRows`).
    pub fn with_base_url(base_url: &str, service_key: &str, page_size: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            request: PageRequest::first(service_key, page_size),
        }
    }

    /// Create a client from the run configuration, honouring its timeout.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            request: PageRequest::first(&config.service_key, config.page_size),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for a page.
    ///
    /// Built by hand so the service key goes out encoded exactly once.
    fn page_url(&self, page_no: u32) -> String {
        let request = self.request.for_page(page_no);
        format!("{}?{}", self.base_url, request.query_string())
    }
}

impl RegionSource for StanRegionClient {
    async fn fetch_page(&self, page_no: u32) -> Result<PageResponse> {
        let url = self.page_url(page_no);
        // The URL carries the service key; keep it out of error messages.
        let transport = |source: reqwest::Error| FetchError::Transport {
            page: page_no,
            source: source.without_url(),
        };

        debug!(page = page_no, "Requesting region page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        let body = response.bytes().await.map_err(transport)?;

        PageResponse::from_slice(page_no, &body)
    }
}
