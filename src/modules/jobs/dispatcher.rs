/// Static mapping from work item kind to handler
///
/// All supported job kinds are listed in the single `match` in `dispatch`.
/// Adding a kind means one `WorkItem` variant and one arm here.
use crate::modules::jobs::domain::ports::{
    DataExporter, DataImporter, DataPurger, ExportAggregation, ExportRequest,
};
use crate::modules::jobs::domain::work_item::{
    DailyAverageExportWorkItem, ImportWorkItem, MeasurementExportWorkItem,
    PlannedMealPurgeWorkItem, WorkItem,
};
use crate::shared::domain::value_objects::MeasurementCategory;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::{log_debug, log_info};
use chrono::{Local, NaiveDate};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Collaborators and settings shared by every handler
#[derive(Clone)]
pub struct JobContext {
    pub importer: Arc<dyn DataImporter>,
    pub exporter: Arc<dyn DataExporter>,
    pub purger: Arc<dyn DataPurger>,
    pub export_path: PathBuf,
}

impl JobContext {
    pub fn new(
        importer: Arc<dyn DataImporter>,
        exporter: Arc<dyn DataExporter>,
        purger: Arc<dyn DataPurger>,
        export_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            importer,
            exporter,
            purger,
            export_path: export_path.into(),
        }
    }
}

/// Run the handler for one work item
pub async fn dispatch(item: &WorkItem, context: &JobContext) -> AppResult<()> {
    use MeasurementCategory::*;

    match item {
        WorkItem::Import(item) => import_measurements(item, context).await,
        WorkItem::BloodGlucoseExport(item) => {
            export_measurements(BloodGlucose, item, context).await
        }
        WorkItem::BloodPressureExport(item) => {
            export_measurements(BloodPressure, item, context).await
        }
        WorkItem::DailyAverageBloodPressureExport(item) => {
            export_daily_averages(BloodPressure, item, context).await
        }
        WorkItem::BloodOxygenSaturationExport(item) => {
            export_measurements(BloodOxygenSaturation, item, context).await
        }
        WorkItem::DailyAverageBloodOxygenSaturationExport(item) => {
            export_daily_averages(BloodOxygenSaturation, item, context).await
        }
        WorkItem::CholesterolExport(item) => export_measurements(Cholesterol, item, context).await,
        WorkItem::ExerciseExport(item) => export_measurements(Exercise, item, context).await,
        WorkItem::WeightExport(item) => export_measurements(Weight, item, context).await,
        WorkItem::MealConsumptionExport(item) => {
            export_measurements(MealConsumption, item, context).await
        }
        WorkItem::PlannedMealExport(item) => export_measurements(PlannedMeal, item, context).await,
        WorkItem::BeverageConsumptionExport(item) => {
            export_measurements(BeverageConsumption, item, context).await
        }
        WorkItem::AlcoholConsumptionExport(item) => {
            export_measurements(AlcoholConsumption, item, context).await
        }
        WorkItem::PlannedMealPurge(item) => purge_planned_meals(item, context).await,
    }
}

async fn import_measurements(item: &ImportWorkItem, context: &JobContext) -> AppResult<()> {
    if item.content.trim().is_empty() {
        return Err(AppError::InvalidInput(format!(
            "No content supplied for {} import",
            item.category.label()
        )));
    }

    log_info!(
        "Importing {} measurements ({} bytes)",
        item.category.label(),
        item.content.len()
    );

    let summary = context
        .importer
        .import(item.category, &item.content)
        .await?;

    log_info!(
        "Imported {} {} measurements",
        summary.records,
        item.category.label()
    );
    Ok(())
}

async fn export_measurements(
    category: MeasurementCategory,
    item: &MeasurementExportWorkItem,
    context: &JobContext,
) -> AppResult<()> {
    let request = ExportRequest {
        category,
        aggregation: ExportAggregation::Individual,
        person_id: item.person_id,
        from: item.from,
        to: item.to,
        file_path: resolve_export_path(&context.export_path, &item.file_name)?,
    };

    run_export(request, context).await
}

async fn export_daily_averages(
    category: MeasurementCategory,
    item: &DailyAverageExportWorkItem,
    context: &JobContext,
) -> AppResult<()> {
    let request = ExportRequest {
        category,
        aggregation: ExportAggregation::DailyAverage,
        person_id: item.person_id,
        from: Some(item.from),
        to: Some(item.to),
        file_path: resolve_export_path(&context.export_path, &item.file_name)?,
    };

    run_export(request, context).await
}

async fn run_export(request: ExportRequest, context: &JobContext) -> AppResult<()> {
    check_range(request.from, request.to)?;

    log_info!(
        "Exporting {} measurements for person {} to {}",
        request.category.label(),
        request.person_id,
        request.file_path.display()
    );
    log_debug!("Export request: {:?}", request);

    let summary = context.exporter.export(&request).await?;

    LogContext::export_written(
        request.category.label(),
        summary.records,
        &summary.file_path.display().to_string(),
    );
    Ok(())
}

async fn purge_planned_meals(
    item: &PlannedMealPurgeWorkItem,
    context: &JobContext,
) -> AppResult<()> {
    let cutoff = item.cutoff.unwrap_or_else(|| Local::now().date_naive());

    log_info!(
        "Purging planned meals for person {} scheduled before {}",
        item.person_id,
        cutoff
    );

    let summary = context
        .purger
        .purge_planned_meals(item.person_id, cutoff)
        .await?;

    log_debug!("Purge removed {} planned meals", summary.records);
    Ok(())
}

fn check_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> AppResult<()> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(AppError::InvalidInput(format!(
            "Export range start {} is after its end {}",
            from, to
        ))),
        _ => Ok(()),
    }
}

/// Join a bare file name onto the export directory.
/// Names with directory components are rejected.
pub fn resolve_export_path(export_path: &Path, file_name: &str) -> AppResult<PathBuf> {
    let trimmed = file_name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "Export file name must not be empty".to_string(),
        ));
    }

    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !trimmed.contains(['/', '\\']) => {
            Ok(export_path.join(trimmed))
        }
        _ => Err(AppError::InvalidInput(format!(
            "Export file name '{}' must be a plain file name",
            file_name
        ))),
    }
}
