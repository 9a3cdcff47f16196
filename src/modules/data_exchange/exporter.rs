/// CSV measurement exporter
use crate::modules::data_exchange::domain::csv_format::RecordFormat;
use crate::modules::data_exchange::domain::measurement::{Measurement, MeasurementValues};
use crate::modules::data_exchange::domain::store::MeasurementStore;
use crate::modules::jobs::domain::ports::{
    DataExporter, ExportAggregation, ExportRequest, ExportSummary,
};
use crate::shared::errors::{AppError, AppResult};
use crate::log_debug;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct CsvMeasurementExporter {
    store: Arc<dyn MeasurementStore>,
}

impl CsvMeasurementExporter {
    pub fn new(store: Arc<dyn MeasurementStore>) -> Self {
        Self { store }
    }

    /// Build the file content for a request without touching the filesystem
    pub async fn render(&self, request: &ExportRequest) -> AppResult<(String, usize)> {
        if request.aggregation == ExportAggregation::DailyAverage
            && !request.category.supports_daily_average()
        {
            return Err(AppError::InvalidInput(format!(
                "Daily averages are not available for {} measurements",
                request.category.label()
            )));
        }

        let measurements = self
            .store
            .list(request.category, request.person_id, request.from, request.to)
            .await?;

        let rows = match request.aggregation {
            ExportAggregation::Individual => measurements,
            ExportAggregation::DailyAverage => daily_averages(&measurements),
        };

        let format = RecordFormat::new(request.category)?;
        let mut content = format.header();
        content.push('\n');
        for row in &rows {
            content.push_str(&format.format(row)?);
            content.push('\n');
        }

        Ok((content, rows.len()))
    }
}

#[async_trait]
impl DataExporter for CsvMeasurementExporter {
    async fn export(&self, request: &ExportRequest) -> AppResult<ExportSummary> {
        let (content, records) = self.render(request).await?;

        if let Some(parent) = request.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        log_debug!(
            "Writing {} bytes to {}",
            content.len(),
            request.file_path.display()
        );
        tokio::fs::write(&request.file_path, content).await?;

        Ok(ExportSummary {
            records,
            file_path: request.file_path.clone(),
        })
    }
}

/// One averaged row per day, stamped at midnight and named after the
/// first reading of that day. Non-averageable readings are skipped.
fn daily_averages(measurements: &[Measurement]) -> Vec<Measurement> {
    let mut days: BTreeMap<NaiveDate, Vec<&Measurement>> = BTreeMap::new();
    for measurement in measurements {
        days.entry(measurement.day()).or_default().push(measurement);
    }

    days.into_iter()
        .filter_map(|(day, readings)| {
            let first = readings.first()?;
            let values = average(&readings)?;
            Some(Measurement {
                person_id: first.person_id,
                name: first.name.clone(),
                date: day.and_time(NaiveTime::MIN),
                values,
            })
        })
        .collect()
}

fn average(readings: &[&Measurement]) -> Option<MeasurementValues> {
    let count = readings.len() as f64;
    match readings.first().map(|m| &m.values)? {
        MeasurementValues::BloodPressure { .. } => {
            let (systolic, diastolic) = readings.iter().fold((0.0, 0.0), |(s, d), m| {
                match m.values {
                    MeasurementValues::BloodPressure {
                        systolic,
                        diastolic,
                    } => (s + systolic as f64, d + diastolic as f64),
                    _ => (s, d),
                }
            });
            Some(MeasurementValues::BloodPressure {
                systolic: (systolic / count).round() as u32,
                diastolic: (diastolic / count).round() as u32,
            })
        }
        MeasurementValues::BloodOxygenSaturation { .. } => {
            let total: f64 = readings
                .iter()
                .filter_map(|m| match m.values {
                    MeasurementValues::BloodOxygenSaturation { percentage } => Some(percentage),
                    _ => None,
                })
                .sum();
            Some(MeasurementValues::BloodOxygenSaturation {
                percentage: (total / count * 100.0).round() / 100.0,
            })
        }
        _ => None,
    }
}
