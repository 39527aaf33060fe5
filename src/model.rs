//! Data models for the region code listing API.
//!
//! Region records themselves are opaque: they are carried through as raw JSON
//! values so the snapshot holds exactly what the API returned, field order
//! included.

use serde::{Deserialize, Deserializer};

use crate::error::{FetchError, Result};

/// A single region record as returned by the API.
pub type RegionRecord = serde_json::Value;

/// Response format selector sent as `type`.
pub const RESPONSE_FORMAT: &str = "json";

/// Mode flag sent as `flag`; `Y` selects the full listing.
pub const ALL_REGIONS_FLAG: &str = "Y";

/// Query parameters for one page request.
///
/// Only `page_no` changes between requests of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Service key, already percent-encoded for the query string.
    pub service_key: String,

    /// 1-indexed page number.
    pub page_no: u32,

    /// Rows per page.
    pub num_of_rows: u32,
}

impl PageRequest {
    /// Create the request for page 1.
    ///
    /// Keys handed out pre-encoded (containing `%`) are kept as-is so they are
    /// not encoded twice.
    pub fn first(service_key: &str, num_of_rows: u32) -> Self {
        let service_key = if service_key.contains('%') {
            service_key.to_string()
        } else {
            urlencoding::encode(service_key).into_owned()
        };
        Self {
            service_key,
            page_no: 1,
            num_of_rows,
        }
    }

    /// The same request for another page.
    pub fn for_page(&self, page_no: u32) -> Self {
        Self {
            page_no,
            ..self.clone()
        }
    }

    /// Encoded query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        format!(
            "serviceKey={}&type={}&pageNo={}&numOfRows={}&flag={}",
            self.service_key, RESPONSE_FORMAT, self.page_no, self.num_of_rows, ALL_REGIONS_FLAG
        )
    }
}

/// One page of the listing: `{ response: { body: { items, totalCount } } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// Records on this page, in API order.
    pub items: Vec<RegionRecord>,

    /// Total number of records the API reports for the whole listing.
    pub total_count: u64,
}

impl PageResponse {
    /// Parse a raw response body for the given page.
    pub fn from_slice(page_no: u32, body: &[u8]) -> Result<Self> {
        let envelope: Envelope =
            serde_json::from_slice(body).map_err(|e| FetchError::parse(page_no, e.to_string()))?;
        let PageBody { items, total_count } = envelope.response.body;
        Ok(Self { items, total_count })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Deserialize)]
struct Envelope {
    response: ResponseNode,
}

#[derive(Deserialize)]
struct ResponseNode {
    body: PageBody,
}

#[derive(Deserialize)]
struct PageBody {
    #[serde(deserialize_with = "items_or_null")]
    items: Vec<RegionRecord>,

    #[serde(rename = "totalCount", deserialize_with = "count_from_number_or_string")]
    total_count: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItems {
    List(Vec<RegionRecord>),
    Text(String),
    Map(serde_json::Map<String, RegionRecord>),
}

/// An exhausted listing reports `items` as `null`, `""` or `{}`; all read as
/// an empty page. Any other non-array value is rejected.
fn items_or_null<'de, D>(deserializer: D) -> core::result::Result<Vec<RegionRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawItems>::deserialize(deserializer) {
        Ok(None) => Ok(Vec::new()),
        Ok(Some(RawItems::List(items))) => Ok(items),
        Ok(Some(RawItems::Text(s))) if s.is_empty() => Ok(Vec::new()),
        Ok(Some(RawItems::Map(m))) if m.is_empty() => Ok(Vec::new()),
        Ok(Some(_)) | Err(_) => Err(serde::de::Error::custom("items must be an array or empty")),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Float(f64),
    Text(String),
}

fn count_from_number_or_string<'de, D>(deserializer: D) -> core::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawCount::deserialize(deserializer) {
        Ok(RawCount::Number(n)) => Ok(n),
        Ok(RawCount::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(f as u64)
        }
        Ok(RawCount::Float(f)) => Err(serde::de::Error::custom(format!(
            "totalCount must be a non-negative integer, got {f}"
        ))),
        Ok(RawCount::Text(s)) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("totalCount is not an integer: {s:?}"))
        }),
        Err(_) => Err(serde::de::Error::custom(
            "totalCount must be a non-negative integer",
        )),
    }
}
