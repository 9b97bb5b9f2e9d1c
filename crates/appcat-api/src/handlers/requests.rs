//! App-request endpoints: create, list, approve, reject.
//!
//! Role gating happens here at the routing layer; the workflow re-validates
//! as a defense-in-depth invariant.

use appcat_core::authz::{allows, Operation};
use appcat_core::request::RequestStatus;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::apps::SelfLinks;
use crate::identity::Caller;
use crate::models::{AppRequestRecord, CreateAppRequestBody, ListRequestsParams, RejectBody};
use crate::router::AppState;
use crate::search::envelope::Href;
use crate::search::query::{parse_positive, DEFAULT_LIMIT, MAX_LIMIT, MAX_PAGE};

/// Paginated listing of app requests.
#[derive(Debug, Serialize)]
pub struct ListRequestsResponse {
    /// Self link.
    #[serde(rename = "_links")]
    pub links: SelfLinks,
    /// Requests for this page, newest first.
    pub items: Vec<AppRequestRecord>,
    /// Current page number.
    pub page: i64,
    /// Page size.
    pub limit: i64,
    /// Total matches across all pages.
    pub total: i64,
}

/// Handle `POST /api/app-requests`.
///
/// # Errors
///
/// `Forbidden` unless the caller role is USER, `InvalidInput` for a bad
/// reason, `NotFound` for an unknown app.
pub async fn create_request_handler(
    State(state): State<AppState>,
    Caller(actor): Caller,
    Json(body): Json<CreateAppRequestBody>,
) -> Result<(StatusCode, Json<AppRequestRecord>), ApiError> {
    if !allows(Operation::SubmitRequest, actor.role) {
        return Err(ApiError::Forbidden("only users may submit app requests"));
    }
    let created = state
        .workflow
        .create(&actor, body.app_id, &body.request_reason)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handle `GET /api/app-requests` (admin only).
///
/// # Errors
///
/// `Forbidden` for non-admin callers, `InvalidInput` for malformed paging or
/// an unknown status filter.
pub async fn list_requests_handler(
    State(state): State<AppState>,
    Caller(actor): Caller,
    params: Result<Query<ListRequestsParams>, QueryRejection>,
) -> Result<Json<ListRequestsResponse>, ApiError> {
    if !allows(Operation::ListRequests, actor.role) {
        return Err(ApiError::Forbidden("admin role required"));
    }
    let Query(raw) = params.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let status = raw
        .status
        .as_deref()
        .map(str::parse::<RequestStatus>)
        .transpose()
        .map_err(|_| ApiError::InvalidInput("invalid query parameter: status".to_owned()))?;
    let page = parse_positive(raw.page.as_deref(), "page")?.unwrap_or(1);
    if page > MAX_PAGE {
        return Err(ApiError::InvalidInput("invalid query parameter: page".to_owned()));
    }
    let limit = parse_positive(raw.limit.as_deref(), "limit")?.unwrap_or(DEFAULT_LIMIT);
    if limit > MAX_LIMIT {
        return Err(ApiError::InvalidInput("invalid query parameter: limit".to_owned()));
    }

    let (items, total) = state.workflow.list(status, page, limit).await?;

    Ok(Json(ListRequestsResponse {
        links: SelfLinks {
            self_: Href {
                href: "/api/app-requests".to_owned(),
            },
        },
        items,
        page,
        limit,
        total,
    }))
}

/// Handle `PUT /api/app-requests/{id}/approve` (admin only).
///
/// # Errors
///
/// `Forbidden`, `NotFound`, or `Conflict` per the workflow's preconditions.
pub async fn approve_request_handler(
    State(state): State<AppState>,
    Caller(actor): Caller,
    Path(request_id): Path<Uuid>,
) -> Result<Json<AppRequestRecord>, ApiError> {
    if !allows(Operation::ApproveRequest, actor.role) {
        return Err(ApiError::Forbidden("admin role required"));
    }
    let updated = state.workflow.approve(&actor, request_id).await?;
    Ok(Json(updated))
}

/// Handle `PUT /api/app-requests/{id}/reject` (admin only).
///
/// # Errors
///
/// As approve, plus `InvalidInput` for a bad rejection reason.
pub async fn reject_request_handler(
    State(state): State<AppState>,
    Caller(actor): Caller,
    Path(request_id): Path<Uuid>,
    Json(body): Json<RejectBody>,
) -> Result<Json<AppRequestRecord>, ApiError> {
    if !allows(Operation::RejectRequest, actor.role) {
        return Err(ApiError::Forbidden("admin role required"));
    }
    let updated = state
        .workflow
        .reject(&actor, request_id, &body.rejection_reason)
        .await?;
    Ok(Json(updated))
}
