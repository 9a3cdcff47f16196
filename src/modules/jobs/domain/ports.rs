/// Collaborators that perform the actual import/export work
///
/// Jobs hold no data logic of their own; handlers translate a work item into a
/// single call on one of these ports.
use crate::shared::domain::value_objects::MeasurementCategory;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportAggregation {
    /// One row per stored measurement
    Individual,
    /// One row per person and day
    DailyAverage,
}

/// Everything an exporter needs for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub category: MeasurementCategory,
    pub aggregation: ExportAggregation,
    pub person_id: i64,
    /// Inclusive; `None` leaves the range open
    pub from: Option<NaiveDate>,
    /// Inclusive; `None` leaves the range open
    pub to: Option<NaiveDate>,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub records: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PurgeSummary {
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub records: usize,
    pub file_path: PathBuf,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataImporter: Send + Sync {
    /// Parse and persist CSV content in the category's format
    async fn import(&self, category: MeasurementCategory, content: &str)
        -> AppResult<ImportSummary>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataExporter: Send + Sync {
    async fn export(&self, request: &ExportRequest) -> AppResult<ExportSummary>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataPurger: Send + Sync {
    /// Remove a person's planned meals dated strictly before `cutoff`
    async fn purge_planned_meals(&self, person_id: i64, cutoff: NaiveDate)
        -> AppResult<PurgeSummary>;
}
