use crate::modules::data_exchange::domain::measurement::Measurement;
use crate::shared::domain::value_objects::MeasurementCategory;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Persistence for measurements read by exports and written by imports
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    async fn add(&self, measurement: &Measurement) -> AppResult<()>;

    /// A person's measurements in one category, oldest first.
    /// Date bounds are inclusive and compare calendar days.
    async fn list(
        &self,
        category: MeasurementCategory,
        person_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<Measurement>>;

    /// Delete a person's measurements in one category dated before `cutoff`,
    /// returning how many went
    async fn remove_before(
        &self,
        category: MeasurementCategory,
        person_id: i64,
        cutoff: NaiveDate,
    ) -> AppResult<usize>;
}
