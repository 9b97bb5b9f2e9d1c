//! Shared test doubles for the boundary traits.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use appcat_api::models::{AppDetail, AppRequestRecord, NewAppRequest};
use appcat_api::notify::{Notifier, NotifyError, RequestEvent};
use appcat_api::requests::store::{CatalogStore, StoreError};
use appcat_api::router::AppState;
use appcat_api::search::engine::{EngineError, RawSearchResponse, SearchEngine};
use appcat_api::BoxFuture;
use appcat_core::request::{Decision, RequestStatus};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

/// In-memory [`CatalogStore`].
#[derive(Default)]
pub struct MemStore {
    pub apps: Mutex<HashMap<Uuid, AppDetail>>,
    pub requests: Mutex<HashMap<Uuid, AppRequestRecord>>,
}

impl MemStore {
    pub fn with_app(app_id: Uuid) -> Self {
        let store = Self::default();
        store.apps.lock().unwrap().insert(app_id, sample_app(app_id));
        store
    }
}

pub fn sample_app(id: Uuid) -> AppDetail {
    AppDetail {
        id,
        key: "sync-tool".to_owned(),
        name: "Sync Tool".to_owned(),
        summary: Some("Keeps things in sync".to_owned()),
        partner_name: Some("Acme".to_owned()),
        hosting: Some("cloud".to_owned()),
        pricing_model: Some("free".to_owned()),
        programs: vec!["startup".to_owned()],
        rating_average: 4.2,
        installs: 120,
        created_at: Utc::now(),
    }
}

impl CatalogStore for MemStore {
    fn app_exists<'a>(&'a self, app_id: Uuid) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move { Ok(self.apps.lock().unwrap().contains_key(&app_id)) })
    }

    fn app_by_key<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<AppDetail>, StoreError>> {
        Box::pin(async move {
            Ok(self
                .apps
                .lock()
                .unwrap()
                .values()
                .find(|app| app.key == key)
                .cloned())
        })
    }

    fn insert_request<'a>(
        &'a self,
        new: &'a NewAppRequest,
    ) -> BoxFuture<'a, Result<AppRequestRecord, StoreError>> {
        Box::pin(async move {
            let record = AppRequestRecord {
                id: Uuid::new_v4(),
                app_id: new.app_id,
                requester_id: new.requester_id.clone(),
                organization_id: new.organization_id.clone(),
                request_reason: new.request_reason.clone(),
                status: RequestStatus::Pending,
                rejection_reason: None,
                processor_id: None,
                processed_at: None,
                created_at: Utc::now(),
            };
            self.requests
                .lock()
                .unwrap()
                .insert(record.id, record.clone());
            Ok(record)
        })
    }

    fn request_by_id<'a>(
        &'a self,
        id: Uuid,
    ) -> BoxFuture<'a, Result<Option<AppRequestRecord>, StoreError>> {
        Box::pin(async move { Ok(self.requests.lock().unwrap().get(&id).cloned()) })
    }

    fn transition_request<'a>(
        &'a self,
        id: Uuid,
        decision: &'a Decision,
        processor_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<AppRequestRecord>, StoreError>> {
        Box::pin(async move {
            let mut requests = self.requests.lock().unwrap();
            let Some(record) = requests.get_mut(&id) else {
                return Ok(None);
            };
            if record.status != RequestStatus::Pending {
                return Ok(None);
            }
            record.status = decision.status();
            record.rejection_reason = decision.rejection_reason().map(str::to_owned);
            record.processor_id = Some(processor_id.to_owned());
            record.processed_at = Some(Utc::now());
            Ok(Some(record.clone()))
        })
    }

    fn list_requests<'a>(
        &'a self,
        status: Option<RequestStatus>,
        page: i64,
        limit: i64,
    ) -> BoxFuture<'a, Result<(Vec<AppRequestRecord>, i64), StoreError>> {
        Box::pin(async move {
            let requests = self.requests.lock().unwrap();
            let mut matching: Vec<_> = requests
                .values()
                .filter(|r| status.map_or(true, |s| r.status == s))
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let total = i64::try_from(matching.len()).unwrap();

            let offset = usize::try_from((page - 1) * limit).unwrap();
            let items = matching
                .into_iter()
                .skip(offset)
                .take(usize::try_from(limit).unwrap())
                .collect();
            Ok((items, total))
        })
    }
}

/// Engine double returning a canned response.
pub struct StubEngine {
    pub response: RawSearchResponse,
}

impl StubEngine {
    pub fn from_json(json: Value) -> Self {
        Self {
            response: serde_json::from_value(json).unwrap(),
        }
    }
}

impl SearchEngine for StubEngine {
    fn search<'a>(
        &'a self,
        _body: &'a Value,
    ) -> BoxFuture<'a, Result<RawSearchResponse, EngineError>> {
        Box::pin(async move { Ok(self.response.clone()) })
    }
}

/// Engine double that always fails, as if the index were unreachable.
pub struct DownEngine;

impl SearchEngine for DownEngine {
    fn search<'a>(
        &'a self,
        _body: &'a Value,
    ) -> BoxFuture<'a, Result<RawSearchResponse, EngineError>> {
        Box::pin(async move {
            // Build a real reqwest error by failing to connect.
            let err = reqwest::Client::new()
                .get("http://127.0.0.1:1/_down")
                .send()
                .await
                .unwrap_err();
            Err(EngineError::Http(err))
        })
    }
}

/// Notifier double recording every delivered event.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<RequestEvent>>,
}

impl Notifier for RecordingNotifier {
    fn notify<'a>(&'a self, event: &'a RequestEvent) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        })
    }
}

/// Notifier double that always fails delivery.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify<'a>(&'a self, _event: &'a RequestEvent) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move { Err(NotifyError::Send("mailbox on fire".to_owned())) })
    }
}

/// State wired to in-memory doubles, returning the notifier for assertions.
pub fn state_with_app(app_id: Uuid) -> (AppState, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::new(
        Arc::new(MemStore::with_app(app_id)),
        Arc::new(StubEngine::from_json(serde_json::json!({
            "hits": { "total": 0, "hits": [] }
        }))),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    );
    (state, notifier)
}

/// Let spawned fire-and-forget tasks run to completion.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
