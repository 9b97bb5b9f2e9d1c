//! Search parameter validation and engine request construction.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Maximum accepted length for the free-text term.
const MAX_TERM_LEN: usize = 200;
/// Maximum accepted length for a filter value.
const MAX_FILTER_LEN: usize = 100;
pub(crate) const DEFAULT_LIMIT: i64 = 20;
pub(crate) const MAX_LIMIT: i64 = 50;
/// Highest addressable page; keeps `(page - 1) * limit` well inside `i64`
/// and matches the engine's result-window ceiling.
pub(crate) const MAX_PAGE: i64 = 10_000;

/// Errors produced while validating raw search parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The named query parameter is malformed or out of range.
    #[error("invalid query parameter: {0}")]
    InvalidParameter(&'static str),
    /// `sortBy` is not one of the enumerated sort keys.
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
}

/// Raw query-string input for `GET /api/apps/search`. Every field arrives as
/// an optional string; unknown fields are rejected at deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSearchParams {
    /// Free-text term.
    pub application: Option<String>,
    /// Hosting filter.
    pub hosting: Option<String>,
    /// Pricing-tier filter.
    pub cost: Option<String>,
    /// Partner-program filter.
    pub program: Option<String>,
    /// Sort key.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
}

/// Enumerated sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Engine relevance score, descending.
    Relevance,
    /// Install count, descending.
    TopSelling,
    /// Average rating, descending.
    TopRated,
    /// Creation time, descending.
    Newest,
}

impl SortKey {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "relevance" => Some(Self::Relevance),
            "top-selling" => Some(Self::TopSelling),
            "top-rated" => Some(Self::TopRated),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }

    /// Engine sort spec. `_id` ascending breaks ties so identical primary
    /// keys order deterministically rather than by engine default.
    fn engine_sort(self) -> Value {
        let primary = match self {
            Self::Relevance => json!({ "_score": { "order": "desc" } }),
            Self::TopSelling => json!({ "installs": { "order": "desc" } }),
            Self::TopRated => json!({ "ratingAverage": { "order": "desc" } }),
            Self::Newest => json!({ "createdAt": { "order": "desc" } }),
        };
        json!([primary, { "_id": { "order": "asc" } }])
    }
}

/// A validated, immutable search query. Page and limit are always concrete
/// positive integers by the time this value exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text term, trimmed; `None` matches everything.
    pub term: Option<String>,
    /// Hosting filter, lowercased.
    pub hosting: Option<String>,
    /// Pricing-tier filter, lowercased.
    pub cost: Option<String>,
    /// Partner-program filter, lowercased.
    pub program: Option<String>,
    /// Sort order.
    pub sort: SortKey,
    /// Page number, 1..=10000.
    pub page: i64,
    /// Page size, 1..=50.
    pub limit: i64,
}

impl SearchQuery {
    /// Validate raw parameters into an immutable query value.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] naming the offending field for out-of-range
    /// numerics, over-long strings, or an unknown sort key.
    pub fn from_raw(raw: &RawSearchParams) -> Result<Self, QueryError> {
        let term = match &raw.application {
            Some(t) if t.chars().count() > MAX_TERM_LEN => {
                return Err(QueryError::InvalidParameter("application"))
            }
            Some(t) if !t.trim().is_empty() => Some(t.trim().to_owned()),
            _ => None,
        };

        let sort = match &raw.sort_by {
            Some(s) => SortKey::parse(s).ok_or_else(|| QueryError::UnknownSortKey(s.clone()))?,
            None => SortKey::Relevance,
        };

        let limit = parse_positive(raw.limit.as_deref(), "limit")?.unwrap_or(DEFAULT_LIMIT);
        if limit > MAX_LIMIT {
            return Err(QueryError::InvalidParameter("limit"));
        }

        let page = parse_positive(raw.page.as_deref(), "page")?.unwrap_or(1);
        if page > MAX_PAGE {
            return Err(QueryError::InvalidParameter("page"));
        }

        Ok(Self {
            term,
            hosting: normalize_filter(raw.hosting.as_deref(), "hosting")?,
            cost: normalize_filter(raw.cost.as_deref(), "cost")?,
            program: normalize_filter(raw.program.as_deref(), "program")?,
            sort,
            page,
            limit,
        })
    }

    /// Build the engine request body: text clause, filters, sort, pagination,
    /// and the three fixed facet aggregations. Pure and deterministic.
    #[must_use]
    pub fn engine_body(&self) -> Value {
        let text = match &self.term {
            Some(term) => json!({
                "multi_match": {
                    "query": term,
                    "fields": ["name^3", "summary^2", "partnerName", "categories", "keywords"],
                    "fuzziness": "AUTO"
                }
            }),
            None => json!({ "match_all": {} }),
        };

        let mut filter = Vec::new();
        if let Some(hosting) = &self.hosting {
            filter.push(json!({ "term": { "hosting": hosting } }));
        }
        if let Some(cost) = &self.cost {
            filter.push(json!({ "term": { "pricingModel": cost } }));
        }
        if let Some(program) = &self.program {
            filter.push(json!({ "term": { "programs": program } }));
        }

        json!({
            "from": (self.page - 1) * self.limit,
            "size": self.limit,
            "query": { "bool": { "must": [text], "filter": filter } },
            "sort": self.sort.engine_sort(),
            "aggs": {
                "by_hosting": { "terms": { "field": "hosting" } },
                "by_program": { "terms": { "field": "programs" } },
                "by_cost": { "terms": { "field": "pricingModel" } }
            }
        })
    }
}

pub(crate) fn parse_positive(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<i64>, QueryError> {
    match raw {
        None => Ok(None),
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n >= 1 => Ok(Some(n)),
            _ => Err(QueryError::InvalidParameter(field)),
        },
    }
}

fn normalize_filter(raw: Option<&str>, field: &'static str) -> Result<Option<String>, QueryError> {
    match raw {
        None => Ok(None),
        Some(s) if s.chars().count() > MAX_FILTER_LEN => {
            Err(QueryError::InvalidParameter(field))
        }
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Ok(Some(s.trim().to_lowercase())),
    }
}
