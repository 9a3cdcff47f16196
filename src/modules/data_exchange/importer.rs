/// CSV measurement importer
///
/// Imports are all-or-nothing with respect to content: every record is parsed
/// and validated before the first one is written.
use crate::modules::data_exchange::domain::csv_format::RecordFormat;
use crate::modules::data_exchange::domain::measurement::{Measurement, MeasurementValues};
use crate::modules::data_exchange::domain::store::MeasurementStore;
use crate::modules::jobs::domain::ports::{DataImporter, ImportSummary};
use crate::shared::domain::value_objects::MeasurementCategory;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::{log_debug, log_warn};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

const PROGRESS_INTERVAL: usize = 100;

pub struct CsvMeasurementImporter {
    store: Arc<dyn MeasurementStore>,
}

impl CsvMeasurementImporter {
    pub fn new(store: Arc<dyn MeasurementStore>) -> Self {
        Self { store }
    }

    /// Parse and validate every record without storing anything
    pub fn validate(
        &self,
        category: MeasurementCategory,
        content: &str,
    ) -> AppResult<Vec<Measurement>> {
        if !category.supports_import() {
            return Err(AppError::InvalidInput(format!(
                "{} measurements cannot be imported",
                category.label()
            )));
        }

        let format = RecordFormat::new(category)?;
        let now = Local::now().naive_local();

        // Blank lines are dropped before numbering
        let mut lines = content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(index, line)| (index + 1, line));

        let (_, header) = lines.next().ok_or_else(|| {
            AppError::InvalidInput(format!("No content supplied for {} import", category.label()))
        })?;
        format.check_header(header)?;

        lines
            .map(|(line_number, line)| {
                let measurement = format.parse(line, line_number)?;
                check_fields(&measurement, line_number, now)?;
                Ok(measurement)
            })
            .collect()
    }
}

#[async_trait]
impl DataImporter for CsvMeasurementImporter {
    async fn import(
        &self,
        category: MeasurementCategory,
        content: &str,
    ) -> AppResult<ImportSummary> {
        let measurements = self.validate(category, content)?;
        let total = measurements.len();

        if total == 0 {
            log_warn!("No {} records found to import", category.label());
            return Ok(ImportSummary::default());
        }

        log_debug!("Validated {} {} records", total, category.label());

        for (index, measurement) in measurements.iter().enumerate() {
            self.store.add(measurement).await?;

            let imported = index + 1;
            if imported % PROGRESS_INTERVAL == 0 || imported == total {
                LogContext::import_progress(category.label(), imported, total);
            }
        }

        Ok(ImportSummary { records: total })
    }
}

fn check_fields(
    measurement: &Measurement,
    line_number: usize,
    now: NaiveDateTime,
) -> AppResult<()> {
    let invalid = |field: &str| {
        Err(AppError::InvalidFieldValue(format!(
            "Invalid value for '{}' at record {}",
            field, line_number
        )))
    };

    if measurement.person_id <= 0 {
        return invalid("Person ID");
    }
    if measurement.name.trim().is_empty() {
        return invalid("Name");
    }
    // Planned meals are the only records expected to lie in the future
    if measurement.category() != MeasurementCategory::PlannedMeal && measurement.date > now {
        return invalid("Date");
    }

    match &measurement.values {
        MeasurementValues::BloodGlucose { level } if *level <= 0.0 => invalid("Level"),
        MeasurementValues::BloodPressure { systolic, .. } if *systolic == 0 => invalid("Systolic"),
        MeasurementValues::BloodPressure { diastolic, .. } if *diastolic == 0 => {
            invalid("Diastolic")
        }
        MeasurementValues::BloodOxygenSaturation { percentage }
            if *percentage <= 0.0 || *percentage > 100.0 =>
        {
            invalid("Percentage")
        }
        MeasurementValues::Cholesterol { total, .. } if *total <= 0.0 => invalid("Total"),
        MeasurementValues::Cholesterol { hdl, .. } if *hdl <= 0.0 => invalid("HDL"),
        MeasurementValues::Cholesterol { ldl, .. } if *ldl <= 0.0 => invalid("LDL"),
        MeasurementValues::Exercise { activity_type, .. } if activity_type.trim().is_empty() => {
            invalid("Activity Type")
        }
        MeasurementValues::Exercise {
            minimum_heart_rate,
            maximum_heart_rate,
            ..
        } if minimum_heart_rate > maximum_heart_rate => invalid("Minimum Heart Rate"),
        MeasurementValues::Weight { weight } if *weight <= 0.0 => invalid("Weight"),
        MeasurementValues::MealConsumption { meal_id, .. } if *meal_id <= 0 => invalid("Meal Id"),
        MeasurementValues::MealConsumption { quantity, .. } if *quantity <= 0.0 => {
            invalid("Quantity")
        }
        MeasurementValues::MealConsumption { meal, .. } if meal.trim().is_empty() => {
            invalid("Meal")
        }
        MeasurementValues::PlannedMeal { meal_type, .. } if meal_type.trim().is_empty() => {
            invalid("Meal Type")
        }
        MeasurementValues::PlannedMeal { meal, .. } if meal.trim().is_empty() => invalid("Meal"),
        MeasurementValues::BeverageConsumption { beverage_id, .. } if *beverage_id <= 0 => {
            invalid("Beverage Id")
        }
        MeasurementValues::BeverageConsumption { beverage, .. } if beverage.trim().is_empty() => {
            invalid("Beverage")
        }
        MeasurementValues::BeverageConsumption { quantity, .. } if *quantity == 0 => {
            invalid("Quantity")
        }
        MeasurementValues::BeverageConsumption { volume, .. } if *volume <= 0.0 => {
            invalid("Volume")
        }
        MeasurementValues::BeverageConsumption { abv, .. } if *abv > 100.0 => invalid("ABV"),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::data_exchange::infrastructure::InMemoryMeasurementStore;

    const BP_HEADER: &str = r#""Person ID","Name","Date","Systolic","Diastolic""#;

    fn importer() -> (CsvMeasurementImporter, Arc<InMemoryMeasurementStore>) {
        let store = Arc::new(InMemoryMeasurementStore::new());
        (CsvMeasurementImporter::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_imports_all_valid_records() {
        let (importer, store) = importer();
        let content = format!(
            "{}\r\n{}\r\n{}\r\n",
            BP_HEADER,
            r#""1","Jo","05/01/2024 08:30:00","120","80""#,
            r#""1","Jo","06/01/2024 08:30:00","118","79""#
        );

        let summary = importer
            .import(MeasurementCategory::BloodPressure, &content)
            .await
            .unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(store.count(MeasurementCategory::BloodPressure), 2);
    }

    #[tokio::test]
    async fn test_invalid_record_stores_nothing() {
        let (importer, store) = importer();
        let content = format!(
            "{}\n{}\n{}\n",
            BP_HEADER,
            r#""1","Jo","05/01/2024 08:30:00","120","80""#,
            r#""1","Jo","06/01/2024 08:30:00","0","79""#
        );

        let err = importer
            .import(MeasurementCategory::BloodPressure, &content)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid field value: Invalid value for 'Systolic' at record 3"
        );
        assert_eq!(store.count(MeasurementCategory::BloodPressure), 0);
    }

    #[test]
    fn test_export_only_category_is_rejected() {
        let (importer, _) = importer();
        let result = importer.validate(MeasurementCategory::AlcoholConsumption, "anything");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_beverage_rules_report_field() {
        let (importer, _) = importer();
        let header = RecordFormat::new(MeasurementCategory::BeverageConsumption)
            .unwrap()
            .header();
        let content = format!(
            "{}\n{}",
            header, r#""1","Jo","05/01/2024 19:00:00","3","Stout","1","0","4.2","0""#
        );
        let err = importer
            .validate(MeasurementCategory::BeverageConsumption, &content)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid field value: Invalid value for 'Volume' at record 2"
        );
    }

    #[tokio::test]
    async fn test_header_only_imports_nothing() {
        let (importer, _) = importer();
        let summary = importer
            .import(MeasurementCategory::BloodPressure, BP_HEADER)
            .await
            .unwrap();
        assert_eq!(summary.records, 0);
    }

    #[test]
    fn test_future_dates_rejected_except_planned_meals() {
        let (importer, _) = importer();
        let future = (Local::now() + chrono::Duration::days(30))
            .format("%d/%m/%Y %H:%M:%S")
            .to_string();

        let weight = format!(
            "\"Person ID\",\"Name\",\"Date\",\"Weight\"\n\"1\",\"Jo\",\"{}\",\"80\"",
            future
        );
        assert!(importer
            .validate(MeasurementCategory::Weight, &weight)
            .is_err());

        let planned = format!(
            "\"Person ID\",\"Name\",\"Date\",\"Meal Type\",\"Meal\"\n{}",
            format!("\"1\",\"Jo\",\"{}\",\"Dinner\",\"Stew\"", future)
        );
        assert_eq!(
            importer
                .validate(MeasurementCategory::PlannedMeal, &planned)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_line_numbers_ignore_blank_lines() {
        let (importer, _) = importer();
        let content = format!("{}\n\n\n\"1\",\"Jo\",\"bad\",\"1\",\"2\"", BP_HEADER);
        let err = importer
            .validate(MeasurementCategory::BloodPressure, &content)
            .unwrap_err();
        assert!(err.to_string().ends_with("at line 2"), "{}", err);
    }

    #[tokio::test]
    async fn test_header_with_byte_order_mark_is_accepted() {
        let (importer, store) = importer();
        let content = format!(
            "\u{feff}{}\r\n{}\r\n",
            BP_HEADER, r#""1","Jo","05/01/2024 08:30:00","120","80""#
        );

        let summary = importer
            .import(MeasurementCategory::BloodPressure, &content)
            .await
            .unwrap();

        assert_eq!(summary.records, 1);
        assert_eq!(store.count(MeasurementCategory::BloodPressure), 1);
    }
}
