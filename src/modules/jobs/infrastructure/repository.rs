/// Diesel-based implementation of JobStatusRepository
///
/// Statuses live in PostgreSQL so the audit trail survives restarts.
use crate::modules::jobs::domain::job_status::{normalize_error, JobStatus, JobStatusFilter};
use crate::modules::jobs::domain::repository::{JobStatistics, JobStatusRepository};
use crate::modules::jobs::infrastructure::models::{JobStatusModel, NewJobStatus};
use crate::schema::job_statuses;
use crate::shared::application::pagination::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::{DbConnection, DbPool};
use crate::shared::utils::logger::LogContext;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

pub struct JobStatusRepositoryImpl {
    pool: DbPool,
}

impl JobStatusRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get database connection from pool
    fn get_conn(&self) -> AppResult<DbConnection> {
        self.pool
            .get()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))
    }

    fn filtered(filter: &JobStatusFilter) -> job_statuses::BoxedQuery<'static, Pg> {
        let mut query = job_statuses::table.into_boxed();

        if let Some(name) = &filter.name {
            query = query.filter(job_statuses::name.eq(name.clone()));
        }
        if let Some(after) = filter.started_after {
            query = query.filter(job_statuses::started_at.ge(after));
        }
        if let Some(before) = filter.started_before {
            query = query.filter(job_statuses::started_at.le(before));
        }

        query
    }
}

#[async_trait]
impl JobStatusRepository for JobStatusRepositoryImpl {
    async fn start(
        &self,
        id: Uuid,
        name: &str,
        parameters: &str,
        start: DateTime<Utc>,
    ) -> AppResult<JobStatus> {
        let new_status = NewJobStatus {
            id,
            name,
            parameters,
            started_at: start,
        };

        let mut conn = self.get_conn()?;

        let inserted: JobStatusModel = diesel::insert_into(job_statuses::table)
            .values(&new_status)
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to record job start: {}", e)))?;

        LogContext::db_operation("insert", "job_statuses", None);
        Ok(inserted.to_job_status())
    }

    async fn complete(
        &self,
        id: Uuid,
        end: DateTime<Utc>,
        error: Option<&str>,
    ) -> AppResult<JobStatus> {
        let mut conn = self.get_conn()?;

        let current: JobStatusModel = job_statuses::table
            .find(id)
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get job status: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Job status {} not found", id)))?;

        if current.ended_at.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Job status {} is already complete",
                id
            )));
        }

        let end = end.max(current.started_at);
        let error = normalize_error(error);

        // The ended_at guard keeps a concurrent completion from overwriting this one
        let updated: Option<JobStatusModel> = diesel::update(
            job_statuses::table
                .filter(job_statuses::id.eq(id))
                .filter(job_statuses::ended_at.is_null()),
        )
        .set((
            job_statuses::ended_at.eq(end),
            job_statuses::error.eq(error),
        ))
        .get_result(&mut conn)
        .optional()
        .map_err(|e| AppError::DatabaseError(format!("Failed to record job completion: {}", e)))?;

        LogContext::db_operation("update", "job_statuses", None);

        updated.map(|model| model.to_job_status()).ok_or_else(|| {
            AppError::InvalidInput(format!("Job status {} is already complete", id))
        })
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<JobStatus>> {
        let mut conn = self.get_conn()?;

        let status: Option<JobStatusModel> = job_statuses::table
            .find(id)
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get job status: {}", e)))?;

        Ok(status.map(|s| s.to_job_status()))
    }

    async fn list(
        &self,
        filter: &JobStatusFilter,
        pagination: PaginationParams,
    ) -> AppResult<PaginatedResult<JobStatus>> {
        let mut conn = self.get_conn()?;

        let total: i64 = Self::filtered(filter)
            .count()
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to count job statuses: {}", e)))?;

        let statuses: Vec<JobStatusModel> = Self::filtered(filter)
            .order((job_statuses::started_at.desc(), job_statuses::id.asc()))
            .limit(pagination.limit())
            .offset(pagination.offset())
            .load(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to list job statuses: {}", e)))?;

        Ok(PaginatedResult::new(
            statuses.into_iter().map(|s| s.to_job_status()).collect(),
            total as u64,
            &pagination,
        ))
    }

    async fn get_statistics(&self) -> AppResult<JobStatistics> {
        let mut conn = self.get_conn()?;
        let count_error = |e: diesel::result::Error| {
            AppError::DatabaseError(format!("Failed to count jobs: {}", e))
        };

        let total_count: i64 = job_statuses::table
            .count()
            .get_result(&mut conn)
            .map_err(count_error)?;

        let running_count: i64 = job_statuses::table
            .filter(job_statuses::ended_at.is_null())
            .count()
            .get_result(&mut conn)
            .map_err(count_error)?;

        let failed_count: i64 = job_statuses::table
            .filter(job_statuses::ended_at.is_not_null())
            .filter(job_statuses::error.is_not_null())
            .count()
            .get_result(&mut conn)
            .map_err(count_error)?;

        Ok(JobStatistics {
            running_count,
            succeeded_count: total_count - running_count - failed_count,
            failed_count,
            total_count,
        })
    }
}
