//! `GET /api/apps/search` — faceted full-text catalog search.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::router::AppState;
use crate::search::envelope::{shape, SearchEnvelope};
use crate::search::query::{RawSearchParams, SearchQuery};

/// Base path echoed into envelope links.
pub const SEARCH_BASE_PATH: &str = "/api/apps/search";

/// Handle `GET /api/apps/search`.
///
/// # Errors
///
/// `InvalidInput` for malformed parameters, `Upstream` when the index engine
/// is unreachable or erroring.
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<RawSearchParams>, QueryRejection>,
) -> Result<Json<SearchEnvelope>, ApiError> {
    let Query(raw) = params.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let query = SearchQuery::from_raw(&raw)?;

    let response = state.engine.search(&query.engine_body()).await?;

    Ok(Json(shape(
        SEARCH_BASE_PATH,
        query.page,
        query.limit,
        &response,
    )))
}
