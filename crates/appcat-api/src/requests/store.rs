//! Persistence boundary for the catalog and the request workflow.

use appcat_core::request::{Decision, RequestStatus};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AppDetail, AppRequestRecord, NewAppRequest};
use crate::BoxFuture;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLx returned an error.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// A stored status value is not one of the known statuses.
    #[error("corrupt status value in storage: {0}")]
    CorruptStatus(String),
}

/// Storage operations the workflow and catalog handlers depend on.
pub trait CatalogStore: Send + Sync {
    /// Whether an app with this id exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a storage failure.
    fn app_exists<'a>(&'a self, app_id: Uuid) -> BoxFuture<'a, Result<bool, StoreError>>;

    /// Look up an app by its catalog key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a storage failure.
    fn app_by_key<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<AppDetail>, StoreError>>;

    /// Persist a new pending request and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a storage failure.
    fn insert_request<'a>(
        &'a self,
        new: &'a NewAppRequest,
    ) -> BoxFuture<'a, Result<AppRequestRecord, StoreError>>;

    /// Keyed request lookup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a storage failure.
    fn request_by_id<'a>(
        &'a self,
        id: Uuid,
    ) -> BoxFuture<'a, Result<Option<AppRequestRecord>, StoreError>>;

    /// Apply a decision to a request, guarded on `status = PENDING`.
    /// Returns `None` when the request is missing or no longer pending, so a
    /// racing second transition loses cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a storage failure.
    fn transition_request<'a>(
        &'a self,
        id: Uuid,
        decision: &'a Decision,
        processor_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<AppRequestRecord>, StoreError>>;

    /// One page of requests, newest first, plus the total match count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a storage failure.
    fn list_requests<'a>(
        &'a self,
        status: Option<RequestStatus>,
        page: i64,
        limit: i64,
    ) -> BoxFuture<'a, Result<(Vec<AppRequestRecord>, i64), StoreError>>;
}

const REQUEST_COLUMNS: &str = "id, app_id, requester_id, organization_id, request_reason, \
     status, rejection_reason, processor_id, processed_at, created_at";

/// Postgres-backed [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Wrap a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw request row; status is converted on the way out.
#[derive(Debug, sqlx::FromRow)]
struct AppRequestRow {
    id: Uuid,
    app_id: Uuid,
    requester_id: String,
    organization_id: String,
    request_reason: String,
    status: String,
    rejection_reason: Option<String>,
    processor_id: Option<String>,
    processed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AppRequestRow> for AppRequestRecord {
    type Error = StoreError;

    fn try_from(row: AppRequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<RequestStatus>()
            .map_err(|_| StoreError::CorruptStatus(row.status.clone()))?;
        Ok(Self {
            id: row.id,
            app_id: row.app_id,
            requester_id: row.requester_id,
            organization_id: row.organization_id,
            request_reason: row.request_reason,
            status,
            rejection_reason: row.rejection_reason,
            processor_id: row.processor_id,
            processed_at: row.processed_at,
            created_at: row.created_at,
        })
    }
}

impl CatalogStore for PgCatalogStore {
    fn app_exists<'a>(&'a self, app_id: Uuid) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM apps WHERE id = $1)",
            )
            .bind(app_id)
            .fetch_one(&self.pool)
            .await?;
            Ok(exists)
        })
    }

    fn app_by_key<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<AppDetail>, StoreError>> {
        Box::pin(async move {
            let app = sqlx::query_as::<_, AppDetail>(
                "SELECT id, key, name, summary, partner_name, hosting, pricing_model,
                        programs, rating_average, installs, created_at
                 FROM apps WHERE key = $1",
            )
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
            Ok(app)
        })
    }

    fn insert_request<'a>(
        &'a self,
        new: &'a NewAppRequest,
    ) -> BoxFuture<'a, Result<AppRequestRecord, StoreError>> {
        Box::pin(async move {
            let row = sqlx::query_as::<_, AppRequestRow>(&format!(
                "INSERT INTO app_requests
                     (app_id, requester_id, organization_id, request_reason, status)
                 VALUES ($1, $2, $3, $4, 'PENDING')
                 RETURNING {REQUEST_COLUMNS}"
            ))
            .bind(new.app_id)
            .bind(&new.requester_id)
            .bind(&new.organization_id)
            .bind(&new.request_reason)
            .fetch_one(&self.pool)
            .await?;
            row.try_into()
        })
    }

    fn request_by_id<'a>(
        &'a self,
        id: Uuid,
    ) -> BoxFuture<'a, Result<Option<AppRequestRecord>, StoreError>> {
        Box::pin(async move {
            let row = sqlx::query_as::<_, AppRequestRow>(&format!(
                "SELECT {REQUEST_COLUMNS} FROM app_requests WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            row.map(TryInto::try_into).transpose()
        })
    }

    fn transition_request<'a>(
        &'a self,
        id: Uuid,
        decision: &'a Decision,
        processor_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<AppRequestRecord>, StoreError>> {
        Box::pin(async move {
            // The status guard in the WHERE clause is the serialization
            // point: of two racing transitions, exactly one row-locks the
            // PENDING row and updates it; the other matches nothing.
            let row = sqlx::query_as::<_, AppRequestRow>(&format!(
                "UPDATE app_requests
                 SET status = $2, rejection_reason = $3,
                     processor_id = $4, processed_at = now()
                 WHERE id = $1 AND status = 'PENDING'
                 RETURNING {REQUEST_COLUMNS}"
            ))
            .bind(id)
            .bind(decision.status().as_str())
            .bind(decision.rejection_reason())
            .bind(processor_id)
            .fetch_optional(&self.pool)
            .await?;
            row.map(TryInto::try_into).transpose()
        })
    }

    fn list_requests<'a>(
        &'a self,
        status: Option<RequestStatus>,
        page: i64,
        limit: i64,
    ) -> BoxFuture<'a, Result<(Vec<AppRequestRecord>, i64), StoreError>> {
        Box::pin(async move {
            let status_str = status.map(RequestStatus::as_str);
            // Callers cap page and limit; saturate anyway so an unchecked
            // caller cannot overflow the offset.
            let offset = (page - 1).saturating_mul(limit);

            let rows = sqlx::query_as::<_, AppRequestRow>(&format!(
                "SELECT {REQUEST_COLUMNS} FROM app_requests
                 WHERE ($1::text IS NULL OR status = $1)
                 ORDER BY created_at DESC
                 LIMIT $2 OFFSET $3"
            ))
            .bind(status_str)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM app_requests
                 WHERE ($1::text IS NULL OR status = $1)",
            )
            .bind(status_str)
            .fetch_one(&self.pool)
            .await?;

            let items = rows
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?;
            Ok((items, total))
        })
    }
}
