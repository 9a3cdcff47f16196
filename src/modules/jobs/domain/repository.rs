/// Repository trait for job status persistence
///
/// Only the background worker writes statuses; everything else reads them.
use crate::modules::jobs::domain::job_status::{JobStatus, JobStatusFilter};
use crate::shared::application::pagination::{PaginatedResult, PaginationParams};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[async_trait]
pub trait JobStatusRepository: Send + Sync {
    /// Record a job as running
    async fn start(
        &self,
        id: Uuid,
        name: &str,
        parameters: &str,
        start: DateTime<Utc>,
    ) -> AppResult<JobStatus>;

    /// Close a running job. `error` is `None` on success.
    /// Completing a job twice or completing an unknown job is an error.
    async fn complete(
        &self,
        id: Uuid,
        end: DateTime<Utc>,
        error: Option<&str>,
    ) -> AppResult<JobStatus>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<JobStatus>>;

    /// Newest start first
    async fn list(
        &self,
        filter: &JobStatusFilter,
        pagination: PaginationParams,
    ) -> AppResult<PaginatedResult<JobStatus>>;

    async fn get_statistics(&self) -> AppResult<JobStatistics>;
}

/// Job status counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatistics {
    pub running_count: i64,
    pub succeeded_count: i64,
    pub failed_count: i64,
    pub total_count: i64,
}
