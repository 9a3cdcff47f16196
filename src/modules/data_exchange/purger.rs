/// Planned meal housekeeping
use crate::log_info;
use crate::modules::data_exchange::domain::store::MeasurementStore;
use crate::modules::jobs::domain::ports::{DataPurger, PurgeSummary};
use crate::shared::domain::value_objects::MeasurementCategory;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct MeasurementStorePurger {
    store: Arc<dyn MeasurementStore>,
}

impl MeasurementStorePurger {
    pub fn new(store: Arc<dyn MeasurementStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DataPurger for MeasurementStorePurger {
    async fn purge_planned_meals(
        &self,
        person_id: i64,
        cutoff: NaiveDate,
    ) -> AppResult<PurgeSummary> {
        let records = self
            .store
            .remove_before(MeasurementCategory::PlannedMeal, person_id, cutoff)
            .await?;

        log_info!(
            "Purged {} planned meals for person {} dated before {}",
            records,
            person_id,
            cutoff
        );
        Ok(PurgeSummary { records })
    }
}
