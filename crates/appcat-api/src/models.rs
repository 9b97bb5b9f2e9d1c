//! API resource and request-body models.

use appcat_core::request::RequestStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog app as returned by `GET /api/apps/{key}`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppDetail {
    /// App UUID.
    pub id: Uuid,
    /// Stable catalog key (slug).
    pub key: String,
    /// Display name.
    pub name: String,
    /// Short description.
    pub summary: Option<String>,
    /// Publishing vendor's display name.
    pub partner_name: Option<String>,
    /// Hosting model (e.g. `cloud`, `on-prem`).
    pub hosting: Option<String>,
    /// Pricing tier (e.g. `free`, `subscription`).
    pub pricing_model: Option<String>,
    /// Partner programs the app participates in.
    pub programs: Vec<String>,
    /// Average review rating.
    pub rating_average: f64,
    /// Total install count.
    pub installs: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A persisted app request, also the wire resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRequestRecord {
    /// Request UUID.
    pub id: Uuid,
    /// Referenced app.
    pub app_id: Uuid,
    /// Requesting user, denormalized at creation time.
    pub requester_id: String,
    /// Requester's organization, denormalized at creation time.
    pub organization_id: String,
    /// Justification supplied by the requester.
    pub request_reason: String,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Reason supplied on rejection; absent otherwise.
    pub rejection_reason: Option<String>,
    /// Admin who decided the request.
    pub processor_id: Option<String>,
    /// When the request was decided.
    pub processed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields required to persist a new pending request.
#[derive(Debug, Clone)]
pub struct NewAppRequest {
    /// Referenced app.
    pub app_id: Uuid,
    /// Requesting user.
    pub requester_id: String,
    /// Requester's organization.
    pub organization_id: String,
    /// Validated justification text.
    pub request_reason: String,
}

/// Request body for `POST /api/app-requests`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequestBody {
    /// App to request access to.
    pub app_id: Uuid,
    /// Justification (10–2000 characters).
    pub request_reason: String,
}

/// Request body for `PUT /api/app-requests/{id}/reject`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectBody {
    /// Rejection reason (5–2000 characters).
    pub rejection_reason: String,
}

/// Query parameters for `GET /api/app-requests`, kept as raw strings so
/// validation can name the offending field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListRequestsParams {
    /// Optional status filter.
    pub status: Option<String>,
    /// Page number (default 1).
    pub page: Option<String>,
    /// Page size (default 20, max 50).
    pub limit: Option<String>,
}
