/// Diesel models for the job_statuses table
use crate::modules::jobs::domain::job_status::JobStatus;
use crate::schema::job_statuses;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Diesel model for inserting a running job
#[derive(Insertable, Debug)]
#[diesel(table_name = job_statuses)]
pub struct NewJobStatus<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub parameters: &'a str,
    pub started_at: DateTime<Utc>,
}

/// Diesel model for querying job statuses
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = job_statuses)]
pub struct JobStatusModel {
    pub id: Uuid,
    pub name: String,
    pub parameters: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl JobStatusModel {
    pub fn to_job_status(self) -> JobStatus {
        JobStatus {
            id: self.id,
            name: self.name,
            parameters: self.parameters,
            start: self.started_at,
            end: self.ended_at,
            error: self.error,
        }
    }
}
