//! Shapes raw engine responses into the HAL-style search envelope.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::search::engine::RawSearchResponse;

/// A single hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Href {
    /// Plain query-string URL.
    pub href: String,
}

/// Navigational links for a result page. `prev` is omitted on the first page
/// and `next` on or past the last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    /// Current page.
    #[serde(rename = "self")]
    pub self_: Href,
    /// First page.
    pub first: Href,
    /// Last page.
    pub last: Href,
    /// Previous page, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Href>,
    /// Next page, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Href>,
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number (1-indexed).
    pub number: i64,
    /// Page size.
    pub size: i64,
    /// Total matches across all pages.
    pub total_elements: i64,
    /// Total page count, at least 1.
    pub total_pages: i64,
}

/// Embedded result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embedded {
    /// App summaries in engine order.
    pub apps: Vec<Value>,
}

/// The HAL-style search response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEnvelope {
    /// Navigational links.
    #[serde(rename = "_links")]
    pub links: Links,
    /// Pagination metadata.
    pub page: PageMeta,
    /// Result set.
    #[serde(rename = "_embedded")]
    pub embedded: Embedded,
    /// Facet counts keyed by filter dimension, verbatim from the engine.
    pub facets: Map<String, Value>,
}

/// Shape a raw engine response into the envelope. Malformed upstream data
/// degrades to zero totals and empty facets, never an error. Hit order is
/// preserved exactly as returned.
#[must_use]
pub fn shape(base_path: &str, page: i64, limit: i64, raw: &RawSearchResponse) -> SearchEnvelope {
    let limit = limit.max(1);
    let total = raw.hits.total.count();
    // Saturating: an absurd engine-reported total must not overflow the
    // round-up.
    let total_pages = (total.saturating_add(limit - 1) / limit).max(1);

    let href = |p: i64| Href {
        href: format!("{base_path}?page={p}&limit={limit}"),
    };

    let apps = raw
        .hits
        .hits
        .iter()
        .map(|hit| {
            let mut doc = hit.source.clone();
            doc.insert("id".to_owned(), Value::String(hit.id.clone()));
            Value::Object(doc)
        })
        .collect();

    SearchEnvelope {
        links: Links {
            self_: href(page),
            first: href(1),
            last: href(total_pages),
            prev: (page > 1).then(|| href(page - 1)),
            next: (page < total_pages).then(|| href(page + 1)),
        },
        page: PageMeta {
            number: page,
            size: limit,
            total_elements: total,
            total_pages,
        },
        embedded: Embedded { apps },
        facets: raw.aggregations.clone(),
    }
}
