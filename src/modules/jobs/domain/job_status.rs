/// Audit record of one job execution
use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Derived state of a job status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobOutcome {
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Running => write!(f, "running"),
            JobOutcome::Succeeded => write!(f, "succeeded"),
            JobOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Job status as written by the worker.
///
/// `end` and `error` stay `None` while the job runs. Completion sets `end`
/// (never earlier than `start`) and, for failures, a non-empty `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: Uuid,
    pub name: String,
    pub parameters: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl JobStatus {
    pub fn started(
        id: Uuid,
        name: impl Into<String>,
        parameters: impl Into<String>,
        start: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parameters: parameters.into(),
            start,
            end: None,
            error: None,
        }
    }

    pub fn outcome(&self) -> JobOutcome {
        match (&self.end, &self.error) {
            (None, _) => JobOutcome::Running,
            (Some(_), None) => JobOutcome::Succeeded,
            (Some(_), Some(_)) => JobOutcome::Failed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.end.is_some()
    }

    /// Close the record. Fails if it was already completed.
    pub fn complete(&mut self, end: DateTime<Utc>, error: Option<&str>) -> AppResult<()> {
        if self.is_complete() {
            return Err(AppError::InvalidInput(format!(
                "Job status {} is already complete",
                self.id
            )));
        }

        self.end = Some(self.clamp_end(end));
        self.error = normalize_error(error);
        Ok(())
    }

    /// Completion time adjusted so it never precedes `start`
    pub fn clamp_end(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        end.max(self.start)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }
}

/// Failure messages are never empty; a blank one is replaced
pub fn normalize_error(error: Option<&str>) -> Option<String> {
    error.map(|message| {
        let message = message.trim();
        if message.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message.to_string()
        }
    })
}

/// Criteria for listing job statuses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatusFilter {
    pub name: Option<String>,
    pub started_after: Option<DateTime<Utc>>,
    pub started_before: Option<DateTime<Utc>>,
}

impl JobStatusFilter {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn started_between(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.started_after = after;
        self.started_before = before;
        self
    }

    /// Inclusive on both bounds
    pub fn matches(&self, status: &JobStatus) -> bool {
        self.name.as_ref().map_or(true, |name| &status.name == name)
            && self.started_after.map_or(true, |after| status.start >= after)
            && self.started_before.map_or(true, |before| status.start <= before)
    }
}
