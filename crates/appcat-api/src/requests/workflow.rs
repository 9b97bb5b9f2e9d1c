//! The app-request state machine: role-gated transitions out of PENDING,
//! with best-effort notifications on each transition.

use std::sync::Arc;

use appcat_core::authz::{allows, Operation};
use appcat_core::identity::Identity;
use appcat_core::request::{Decision, RejectionReason, RequestReason, RequestStatus};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{AppRequestRecord, NewAppRequest};
use crate::notify::{dispatch, Notifier, RequestEvent};
use crate::requests::store::CatalogStore;

/// Drives the request lifecycle against the store, with notifications on the
/// side. Owns all transition logic; nothing else mutates request status.
#[derive(Clone)]
pub struct RequestWorkflow {
    store: Arc<dyn CatalogStore>,
    notifier: Arc<dyn Notifier>,
}

impl RequestWorkflow {
    /// Create a workflow over a store and a notifier.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Submit a new request for `app_id`.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless the actor's role is USER, `InvalidInput` for a
    /// reason outside 10–2000 characters, `NotFound` if the app does not
    /// exist.
    pub async fn create(
        &self,
        actor: &Identity,
        app_id: Uuid,
        reason: &str,
    ) -> Result<AppRequestRecord, ApiError> {
        if !allows(Operation::SubmitRequest, actor.role) {
            return Err(ApiError::Forbidden("only users may submit app requests"));
        }
        let reason = RequestReason::new(reason)
            .map_err(|e| ApiError::InvalidInput(format!("requestReason: {e}")))?;
        if !self.store.app_exists(app_id).await? {
            return Err(ApiError::NotFound("app not found"));
        }

        let created = self
            .store
            .insert_request(&NewAppRequest {
                app_id,
                requester_id: actor.user_id.clone(),
                organization_id: actor.organization_id.clone(),
                request_reason: reason.into_inner(),
            })
            .await?;

        dispatch(
            Arc::clone(&self.notifier),
            RequestEvent::Submitted {
                request_id: created.id,
                app_id: created.app_id,
                requester_id: created.requester_id.clone(),
                reason: created.request_reason.clone(),
            },
        );

        Ok(created)
    }

    /// Approve a pending request.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admin actors, `NotFound` for an unknown request,
    /// `Conflict` when the request is no longer pending.
    pub async fn approve(
        &self,
        actor: &Identity,
        request_id: Uuid,
    ) -> Result<AppRequestRecord, ApiError> {
        if !allows(Operation::ApproveRequest, actor.role) {
            return Err(ApiError::Forbidden("admin role required"));
        }
        self.transition(actor, request_id, Decision::Approve).await
    }

    /// Reject a pending request with a reason.
    ///
    /// # Errors
    ///
    /// As [`Self::approve`], plus `InvalidInput` for a reason outside
    /// 5–2000 characters.
    pub async fn reject(
        &self,
        actor: &Identity,
        request_id: Uuid,
        reason: &str,
    ) -> Result<AppRequestRecord, ApiError> {
        if !allows(Operation::RejectRequest, actor.role) {
            return Err(ApiError::Forbidden("admin role required"));
        }
        let reason = RejectionReason::new(reason)
            .map_err(|e| ApiError::InvalidInput(format!("rejectionReason: {e}")))?;
        self.transition(actor, request_id, Decision::Reject(reason))
            .await
    }

    /// One page of requests, newest first.
    ///
    /// # Errors
    ///
    /// `Upstream` on storage failure. Role gating happens at the routing
    /// layer; listing has no state-machine concerns.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<AppRequestRecord>, i64), ApiError> {
        Ok(self.store.list_requests(status, page, limit).await?)
    }

    async fn transition(
        &self,
        actor: &Identity,
        request_id: Uuid,
        decision: Decision,
    ) -> Result<AppRequestRecord, ApiError> {
        const ONLY_PENDING: &str = "only a pending request can be transitioned";

        let existing = self
            .store
            .request_by_id(request_id)
            .await?
            .ok_or(ApiError::NotFound("app request not found"))?;
        if existing.status.is_terminal() {
            return Err(ApiError::Conflict(ONLY_PENDING));
        }

        // The update is guarded on PENDING; if a racing transition committed
        // between the read above and here, this returns None.
        let updated = self
            .store
            .transition_request(request_id, &decision, &actor.user_id)
            .await?
            .ok_or(ApiError::Conflict(ONLY_PENDING))?;

        let event = match updated.status {
            RequestStatus::Approved => RequestEvent::Approved {
                request_id: updated.id,
                app_id: updated.app_id,
                requester_id: updated.requester_id.clone(),
            },
            RequestStatus::Rejected => RequestEvent::Rejected {
                request_id: updated.id,
                app_id: updated.app_id,
                requester_id: updated.requester_id.clone(),
                reason: updated.rejection_reason.clone().unwrap_or_default(),
            },
            RequestStatus::Pending => {
                unreachable!("transition_request only returns rows it moved out of PENDING")
            }
        };
        dispatch(Arc::clone(&self.notifier), event);

        Ok(updated)
    }
}
