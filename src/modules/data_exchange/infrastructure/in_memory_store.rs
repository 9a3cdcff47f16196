/// Process-local measurement store
use crate::modules::data_exchange::domain::measurement::Measurement;
use crate::modules::data_exchange::domain::store::MeasurementStore;
use crate::shared::domain::value_objects::MeasurementCategory;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;

#[derive(Default)]
pub struct InMemoryMeasurementStore {
    measurements: DashMap<MeasurementCategory, Vec<Measurement>>,
}

impl InMemoryMeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, category: MeasurementCategory) -> usize {
        self.measurements
            .get(&category)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl MeasurementStore for InMemoryMeasurementStore {
    async fn add(&self, measurement: &Measurement) -> AppResult<()> {
        self.measurements
            .entry(measurement.category())
            .or_default()
            .push(measurement.clone());
        Ok(())
    }

    async fn list(
        &self,
        category: MeasurementCategory,
        person_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<Measurement>> {
        let mut matching: Vec<Measurement> = self
            .measurements
            .get(&category)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|m| m.person_id == person_id && m.falls_within(from, to))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by_key(|m| m.date);
        Ok(matching)
    }

    async fn remove_before(
        &self,
        category: MeasurementCategory,
        person_id: i64,
        cutoff: NaiveDate,
    ) -> AppResult<usize> {
        let Some(mut entries) = self.measurements.get_mut(&category) else {
            return Ok(0);
        };

        let before = entries.len();
        entries.retain(|m| m.person_id != person_id || m.day() >= cutoff);
        Ok(before - entries.len())
    }
}
