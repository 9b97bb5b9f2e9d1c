//! Index-engine boundary: raw response decoding and the HTTP client.

use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::BoxFuture;

/// Errors talking to the index engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Transport failure or non-success HTTP status.
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Total hit count as engines variously report it: a bare number, an object
/// with a `value` field, or something unrecognised (treated as zero).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    /// Scalar form.
    Count(i64),
    /// `{ "value": n }` form.
    Object {
        /// The reported count.
        value: i64,
    },
    /// Anything else; decoded but counted as zero.
    Unknown(Value),
}

impl TotalHits {
    /// The reported count as a plain non-negative integer.
    #[must_use]
    pub fn count(&self) -> i64 {
        match self {
            Self::Count(n) | Self::Object { value: n } => (*n).max(0),
            Self::Unknown(_) => 0,
        }
    }
}

impl Default for TotalHits {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// One hit: document id plus its stored fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Stored fields.
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

/// The engine's hit listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHits {
    /// Total match count across all pages.
    #[serde(default)]
    pub total: TotalHits,
    /// Hits for the requested page, in engine order.
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// The engine's raw search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResponse {
    /// Hit listing.
    #[serde(default)]
    pub hits: RawHits,
    /// Aggregation buckets keyed by aggregation name. Anything that is not
    /// an object decodes as an empty map.
    #[serde(default, deserialize_with = "object_or_empty")]
    pub aggregations: Map<String, Value>,
}

fn object_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// Executes structured queries against the full-text index.
pub trait SearchEngine: Send + Sync {
    /// Run one query body against the app index.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on transport or HTTP failure.
    fn search<'a>(&'a self, body: &'a Value) -> BoxFuture<'a, Result<RawSearchResponse, EngineError>>;
}

/// `reqwest`-backed [`SearchEngine`] speaking the engine's HTTP search API.
#[derive(Debug, Clone)]
pub struct HttpSearchEngine {
    base_url: String,
    index: String,
    http: Arc<reqwest::Client>,
}

impl HttpSearchEngine {
    /// Create a new engine client for `index` at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            index: index.into(),
            http: Arc::new(reqwest::Client::new()),
        }
    }
}

impl SearchEngine for HttpSearchEngine {
    fn search<'a>(&'a self, body: &'a Value) -> BoxFuture<'a, Result<RawSearchResponse, EngineError>> {
        Box::pin(async move {
            let url = format!("{}/{}/_search", self.base_url, self.index);
            debug!("querying index at {url}");

            let response = self
                .http
                .post(&url)
                .json(body)
                .send()
                .await?
                .error_for_status()
                .map_err(EngineError::Http)?
                .json::<RawSearchResponse>()
                .await?;

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn total_decodes_scalar_form() {
        let raw: RawSearchResponse =
            serde_json::from_value(json!({ "hits": { "total": 95, "hits": [] } })).unwrap();
        assert_eq!(raw.hits.total.count(), 95);
    }

    #[test]
    fn total_decodes_object_form() {
        let raw: RawSearchResponse =
            serde_json::from_value(json!({ "hits": { "total": { "value": 7 }, "hits": [] } }))
                .unwrap();
        assert_eq!(raw.hits.total.count(), 7);
    }

    #[test]
    fn unknown_total_shape_counts_as_zero() {
        let raw: RawSearchResponse = serde_json::from_value(
            json!({ "hits": { "total": "ninety-five", "hits": [] } }),
        )
        .unwrap();
        assert_eq!(raw.hits.total.count(), 0);

        let raw: RawSearchResponse = serde_json::from_value(
            json!({ "hits": { "total": { "relation": "gte" }, "hits": [] } }),
        )
        .unwrap();
        assert_eq!(raw.hits.total.count(), 0);
    }

    #[test]
    fn negative_total_clamps_to_zero() {
        let raw: RawSearchResponse =
            serde_json::from_value(json!({ "hits": { "total": -3, "hits": [] } })).unwrap();
        assert_eq!(raw.hits.total.count(), 0);
    }

    #[test]
    fn missing_sections_default() {
        let raw: RawSearchResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(raw.hits.total.count(), 0);
        assert!(raw.hits.hits.is_empty());
        assert!(raw.aggregations.is_empty());
    }

    #[test]
    fn hit_decodes_id_and_source() {
        let raw: RawSearchResponse = serde_json::from_value(json!({
            "hits": {
                "total": 1,
                "hits": [{ "_id": "app-1", "_source": { "name": "Sync Tool" } }]
            }
        }))
        .unwrap();
        assert_eq!(raw.hits.hits[0].id, "app-1");
        assert_eq!(raw.hits.hits[0].source["name"], "Sync Tool");
    }
}
