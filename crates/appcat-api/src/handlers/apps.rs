//! `GET /api/apps/{key}` — app detail lookup by catalog key.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::AppDetail;
use crate::router::AppState;
use crate::search::envelope::Href;

/// Hypermedia wrapper for a single app.
#[derive(Debug, Serialize)]
pub struct AppResource {
    /// Self link.
    #[serde(rename = "_links")]
    pub links: SelfLinks,
    /// The app record.
    #[serde(flatten)]
    pub app: AppDetail,
}

/// A link set containing only `self`.
#[derive(Debug, Serialize)]
pub struct SelfLinks {
    /// The resource's own URL.
    #[serde(rename = "self")]
    pub self_: Href,
}

/// Handle `GET /api/apps/{key}`.
///
/// # Errors
///
/// `NotFound` if no app has this key, `Upstream` on a storage failure.
pub async fn get_app_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AppResource>, ApiError> {
    let app = state
        .store
        .app_by_key(&key)
        .await?
        .ok_or(ApiError::NotFound("app not found"))?;

    Ok(Json(AppResource {
        links: SelfLinks {
            self_: Href {
                href: format!("/api/apps/{key}"),
            },
        },
        app,
    }))
}
