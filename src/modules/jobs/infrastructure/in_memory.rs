/// In-process JobStatusRepository, used when no database is reachable
use crate::modules::jobs::domain::job_status::{JobOutcome, JobStatus, JobStatusFilter};
use crate::modules::jobs::domain::repository::{JobStatistics, JobStatusRepository};
use crate::shared::application::pagination::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryJobStatusRepository {
    statuses: DashMap<Uuid, JobStatus>,
}

impl InMemoryJobStatusRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[async_trait]
impl JobStatusRepository for InMemoryJobStatusRepository {
    async fn start(
        &self,
        id: Uuid,
        name: &str,
        parameters: &str,
        start: DateTime<Utc>,
    ) -> AppResult<JobStatus> {
        let status = JobStatus::started(id, name, parameters, start);

        match self.statuses.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::InvalidInput(format!(
                "Job status {} already exists",
                id
            ))),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(status.clone());
                Ok(status)
            }
        }
    }

    async fn complete(
        &self,
        id: Uuid,
        end: DateTime<Utc>,
        error: Option<&str>,
    ) -> AppResult<JobStatus> {
        let mut status = self
            .statuses
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Job status {} not found", id)))?;

        status.complete(end, error)?;
        Ok(status.value().clone())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<JobStatus>> {
        Ok(self.statuses.get(&id).map(|status| status.value().clone()))
    }

    async fn list(
        &self,
        filter: &JobStatusFilter,
        pagination: PaginationParams,
    ) -> AppResult<PaginatedResult<JobStatus>> {
        let mut matching: Vec<JobStatus> = self
            .statuses
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| a.id.cmp(&b.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok(PaginatedResult::new(items, total, &pagination))
    }

    async fn get_statistics(&self) -> AppResult<JobStatistics> {
        let mut stats = JobStatistics::default();

        for entry in self.statuses.iter() {
            match entry.value().outcome() {
                JobOutcome::Running => stats.running_count += 1,
                JobOutcome::Succeeded => stats.succeeded_count += 1,
                JobOutcome::Failed => stats.failed_count += 1,
            }
            stats.total_count += 1;
        }

        Ok(stats)
    }
}
