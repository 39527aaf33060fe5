//! Runtime configuration.
//!
//! Everything the run needs is read from the environment. The service key has
//! no default: it is a credential and must be injected by the operator.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{FetchError, Result};

/// Default endpoint for the standard region code listing.
pub const DEFAULT_API_URL: &str = "http://apis.data.go.kr/1741000/StanReginCd/getStanReginCdList";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "assets/data";

/// Rows requested per page (`numOfRows`).
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Per-request timeout if not specified via environment variable.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upper bound on pages requested in one run.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Keys up to this length are never partially revealed.
const MIN_MASKED_KEY_LEN: usize = 8;

pub const ENV_SERVICE_KEY: &str = "REGION_SERVICE_KEY";
pub const ENV_API_URL: &str = "REGION_API_URL";
pub const ENV_OUTPUT_DIR: &str = "REGION_OUTPUT_DIR";
pub const ENV_PAGE_SIZE: &str = "REGION_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "REGION_TIMEOUT_SECS";
pub const ENV_MAX_PAGES: &str = "REGION_MAX_PAGES";

/// Fetch configuration.
#[derive(Clone)]
pub struct FetchConfig {
    /// Endpoint URL, without query string.
    pub api_url: String,

    /// API credential, either raw or already percent-encoded.
    pub service_key: String,

    /// Directory the snapshot is written into.
    pub output_dir: PathBuf,

    /// Rows per page.
    pub page_size: u32,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Pages requested before the run is abandoned.
    pub max_pages: u32,
}

impl FetchConfig {
    /// Build a configuration with defaults for everything except the key.
    pub fn new(service_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            service_key: service_key.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_key = lookup(ENV_SERVICE_KEY)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| FetchError::Config(format!("{ENV_SERVICE_KEY} is not set")))?;

        let mut config = Self::new(service_key);

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|d| !d.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(size) = parse_positive::<u32>(&lookup, ENV_PAGE_SIZE)? {
            config.page_size = size;
        }
        if let Some(secs) = parse_positive::<u64>(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(pages) = parse_positive::<u32>(&lookup, ENV_MAX_PAGES)? {
            config.max_pages = pages;
        }

        Ok(config)
    }

    /// The service key with all but its first four characters hidden.
    ///
    /// Short keys are hidden entirely.
    pub fn masked_service_key(&self) -> String {
        if self.service_key.chars().count() <= MIN_MASKED_KEY_LEN {
            return "****".to_string();
        }
        let visible: String = self.service_key.chars().take(4).collect();
        format!("{visible}****")
    }
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("api_url", &self.api_url)
            .field("service_key", &self.masked_service_key())
            .field("output_dir", &self.output_dir)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(v) if v != T::default() => Ok(Some(v)),
        _ => Err(FetchError::Config(format!(
            "{name} must be a positive integer, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_only_key() {
        let config = FetchConfig::from_lookup(lookup_from(&[(ENV_SERVICE_KEY, "abc")])).unwrap();

        assert_eq!(config.service_key, "abc");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.output_dir, PathBuf::from("assets/data"));
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_pages, 1000);
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = FetchConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.kind(), "config");

        let err = FetchConfig::from_lookup(lookup_from(&[(ENV_SERVICE_KEY, "   ")])).unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_overrides() {
        let config = FetchConfig::from_lookup(lookup_from(&[
            (ENV_SERVICE_KEY, "abc"),
            (ENV_API_URL, "http://127.0.0.1:9999/list"),
            (ENV_OUTPUT_DIR, "/tmp/regions"),
            (ENV_PAGE_SIZE, "250"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_MAX_PAGES, "12"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:9999/list");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/regions"));
        assert_eq!(config.page_size, 250);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_pages, 12);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        for bad in ["0", "-3", "lots"] {
            let err = FetchConfig::from_lookup(lookup_from(&[
                (ENV_SERVICE_KEY, "abc"),
                (ENV_PAGE_SIZE, bad),
            ]))
            .unwrap_err();
            assert_eq!(err.kind(), "config", "page size {bad:?}");
        }
    }

    #[test]
    fn test_debug_masks_key() {
        let config = FetchConfig::new("SoZiaHO8secret");
        let rendered = format!("{config:?}");

        assert!(rendered.contains("SoZi****"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_short_key_fully_masked() {
        for key in ["abcd", "ab", "abcdefgh"] {
            assert_eq!(FetchConfig::new(key).masked_service_key(), "****", "key {key}");
        }
        assert_eq!(FetchConfig::new("abcdefghi").masked_service_key(), "abcd****");
    }
}
