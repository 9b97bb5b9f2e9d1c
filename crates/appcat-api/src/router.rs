//! Axum router construction.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;

use crate::handlers::{apps, requests, search};
use crate::notify::Notifier;
use crate::requests::store::CatalogStore;
use crate::requests::workflow::RequestWorkflow;
use crate::search::engine::SearchEngine;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Persistence boundary.
    pub store: Arc<dyn CatalogStore>,
    /// Full-text index boundary.
    pub engine: Arc<dyn SearchEngine>,
    /// Request lifecycle driver.
    pub workflow: RequestWorkflow,
}

impl AppState {
    /// Assemble state from the three boundary collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        engine: Arc<dyn SearchEngine>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            workflow: RequestWorkflow::new(Arc::clone(&store), notifier),
            store,
            engine,
        }
    }
}

/// Response body for the health endpoint.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Build the Axum application router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/apps/search", get(search::search_handler))
        .route("/api/apps/:key", get(apps::get_app_handler))
        .route(
            "/api/app-requests",
            post(requests::create_request_handler).get(requests::list_requests_handler),
        )
        .route(
            "/api/app-requests/:id/approve",
            put(requests::approve_request_handler),
        )
        .route(
            "/api/app-requests/:id/reject",
            put(requests::reject_request_handler),
        )
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
