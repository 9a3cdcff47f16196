/// Work items describing deferred import/export jobs
///
/// The set of job kinds is closed: every kind is a `WorkItem` variant and has
/// exactly one queue (`WorkItemKind`) and one handler (see `dispatcher`).
/// Items carry no identity of their own; each submission is wrapped in a
/// `QueuedJob` with a fresh id, so resubmitting an item runs a new job.
use crate::shared::domain::value_objects::MeasurementCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use uuid::Uuid;

/// Queue routing key, one per `WorkItem` variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    Import,
    BloodGlucoseExport,
    BloodPressureExport,
    DailyAverageBloodPressureExport,
    BloodOxygenSaturationExport,
    DailyAverageBloodOxygenSaturationExport,
    CholesterolExport,
    ExerciseExport,
    WeightExport,
    MealConsumptionExport,
    PlannedMealExport,
    BeverageConsumptionExport,
    AlcoholConsumptionExport,
    PlannedMealPurge,
}

impl WorkItemKind {
    /// Every kind, in discriminant order
    pub const ALL: [WorkItemKind; 14] = [
        WorkItemKind::Import,
        WorkItemKind::BloodGlucoseExport,
        WorkItemKind::BloodPressureExport,
        WorkItemKind::DailyAverageBloodPressureExport,
        WorkItemKind::BloodOxygenSaturationExport,
        WorkItemKind::DailyAverageBloodOxygenSaturationExport,
        WorkItemKind::CholesterolExport,
        WorkItemKind::ExerciseExport,
        WorkItemKind::WeightExport,
        WorkItemKind::MealConsumptionExport,
        WorkItemKind::PlannedMealExport,
        WorkItemKind::BeverageConsumptionExport,
        WorkItemKind::AlcoholConsumptionExport,
        WorkItemKind::PlannedMealPurge,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this kind in `ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Open-range export kind for a category
    pub fn export_for(category: MeasurementCategory) -> Self {
        match category {
            MeasurementCategory::BloodGlucose => WorkItemKind::BloodGlucoseExport,
            MeasurementCategory::BloodPressure => WorkItemKind::BloodPressureExport,
            MeasurementCategory::BloodOxygenSaturation => WorkItemKind::BloodOxygenSaturationExport,
            MeasurementCategory::Cholesterol => WorkItemKind::CholesterolExport,
            MeasurementCategory::Exercise => WorkItemKind::ExerciseExport,
            MeasurementCategory::Weight => WorkItemKind::WeightExport,
            MeasurementCategory::MealConsumption => WorkItemKind::MealConsumptionExport,
            MeasurementCategory::PlannedMeal => WorkItemKind::PlannedMealExport,
            MeasurementCategory::BeverageConsumption => WorkItemKind::BeverageConsumptionExport,
            MeasurementCategory::AlcoholConsumption => WorkItemKind::AlcoholConsumptionExport,
        }
    }

    /// Job name used when the submitter does not supply one
    pub fn default_job_name(self) -> &'static str {
        match self {
            WorkItemKind::Import => "Measurement Import",
            WorkItemKind::BloodGlucoseExport => "Blood Glucose Measurement Export",
            WorkItemKind::BloodPressureExport => "Blood Pressure Measurement Export",
            WorkItemKind::DailyAverageBloodPressureExport => "Daily Average Blood Pressure Export",
            WorkItemKind::BloodOxygenSaturationExport => "% SPO2 Measurement Export",
            WorkItemKind::DailyAverageBloodOxygenSaturationExport => "Daily Average % SPO2 Export",
            WorkItemKind::CholesterolExport => "Cholesterol Measurement Export",
            WorkItemKind::ExerciseExport => "Exercise Measurement Export",
            WorkItemKind::WeightExport => "Weight Measurement Export",
            WorkItemKind::MealConsumptionExport => "Meal Consumption Measurement Export",
            WorkItemKind::PlannedMealExport => "Planned Meal Export",
            WorkItemKind::BeverageConsumptionExport => "Beverage Consumption Measurement Export",
            WorkItemKind::AlcoholConsumptionExport => "Alcohol Consumption Measurement Export",
            WorkItemKind::PlannedMealPurge => "Planned Meal Purge",
        }
    }
}

impl fmt::Display for WorkItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkItemKind::Import => "import",
            WorkItemKind::BloodGlucoseExport => "blood_glucose_export",
            WorkItemKind::BloodPressureExport => "blood_pressure_export",
            WorkItemKind::DailyAverageBloodPressureExport => "daily_average_blood_pressure_export",
            WorkItemKind::BloodOxygenSaturationExport => "blood_oxygen_saturation_export",
            WorkItemKind::DailyAverageBloodOxygenSaturationExport => {
                "daily_average_blood_oxygen_saturation_export"
            }
            WorkItemKind::CholesterolExport => "cholesterol_export",
            WorkItemKind::ExerciseExport => "exercise_export",
            WorkItemKind::WeightExport => "weight_export",
            WorkItemKind::MealConsumptionExport => "meal_consumption_export",
            WorkItemKind::PlannedMealExport => "planned_meal_export",
            WorkItemKind::BeverageConsumptionExport => "beverage_consumption_export",
            WorkItemKind::AlcoholConsumptionExport => "alcohol_consumption_export",
            WorkItemKind::PlannedMealPurge => "planned_meal_purge",
        };
        write!(f, "{}", name)
    }
}

/// Raw import payload, parsed and persisted by the importer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportWorkItem {
    pub job_name: String,
    pub category: MeasurementCategory,
    pub content: String,
}

impl ImportWorkItem {
    pub fn new(category: MeasurementCategory, content: impl Into<String>) -> Self {
        Self {
            job_name: format!("{} import", category.label()),
            category,
            content: content.into(),
        }
    }

    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = job_name.into();
        self
    }
}

/// Export of one person's measurements, optionally bounded on either side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementExportWorkItem {
    pub job_name: String,
    pub file_name: String,
    pub person_id: i64,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl MeasurementExportWorkItem {
    pub fn new(
        job_name: impl Into<String>,
        person_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            file_name: file_name.into(),
            person_id,
            from,
            to,
        }
    }
}

/// Export of per-day averages over a closed date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAverageExportWorkItem {
    pub job_name: String,
    pub file_name: String,
    pub person_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DailyAverageExportWorkItem {
    pub fn new(
        job_name: impl Into<String>,
        person_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            file_name: file_name.into(),
            person_id,
            from,
            to,
        }
    }
}

/// Removal of a person's planned meals dated before the cutoff day.
/// Without a cutoff, everything before today goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMealPurgeWorkItem {
    pub job_name: String,
    pub person_id: i64,
    pub cutoff: Option<NaiveDate>,
}

impl PlannedMealPurgeWorkItem {
    pub fn new(person_id: i64, cutoff: Option<NaiveDate>) -> Self {
        Self {
            job_name: WorkItemKind::PlannedMealPurge.default_job_name().to_string(),
            person_id,
            cutoff,
        }
    }
}

/// One unit of deferred work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkItem {
    Import(ImportWorkItem),
    BloodGlucoseExport(MeasurementExportWorkItem),
    BloodPressureExport(MeasurementExportWorkItem),
    DailyAverageBloodPressureExport(DailyAverageExportWorkItem),
    BloodOxygenSaturationExport(MeasurementExportWorkItem),
    DailyAverageBloodOxygenSaturationExport(DailyAverageExportWorkItem),
    CholesterolExport(MeasurementExportWorkItem),
    ExerciseExport(MeasurementExportWorkItem),
    WeightExport(MeasurementExportWorkItem),
    MealConsumptionExport(MeasurementExportWorkItem),
    PlannedMealExport(MeasurementExportWorkItem),
    BeverageConsumptionExport(MeasurementExportWorkItem),
    AlcoholConsumptionExport(MeasurementExportWorkItem),
    PlannedMealPurge(PlannedMealPurgeWorkItem),
}

impl From<ImportWorkItem> for WorkItem {
    fn from(item: ImportWorkItem) -> Self {
        WorkItem::Import(item)
    }
}

impl From<PlannedMealPurgeWorkItem> for WorkItem {
    fn from(item: PlannedMealPurgeWorkItem) -> Self {
        WorkItem::PlannedMealPurge(item)
    }
}

impl WorkItem {
    /// Create an import job for CSV content in the given category's format
    pub fn import(category: MeasurementCategory, content: impl Into<String>) -> Self {
        WorkItem::Import(ImportWorkItem::new(category, content))
    }

    /// Create an export job for one category with an optional date range
    pub fn export(
        category: MeasurementCategory,
        person_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        file_name: impl Into<String>,
    ) -> Self {
        let item = MeasurementExportWorkItem::new(
            WorkItemKind::export_for(category).default_job_name(),
            person_id,
            from,
            to,
            file_name,
        );

        match category {
            MeasurementCategory::BloodGlucose => WorkItem::BloodGlucoseExport(item),
            MeasurementCategory::BloodPressure => WorkItem::BloodPressureExport(item),
            MeasurementCategory::BloodOxygenSaturation => {
                WorkItem::BloodOxygenSaturationExport(item)
            }
            MeasurementCategory::Cholesterol => WorkItem::CholesterolExport(item),
            MeasurementCategory::Exercise => WorkItem::ExerciseExport(item),
            MeasurementCategory::Weight => WorkItem::WeightExport(item),
            MeasurementCategory::MealConsumption => WorkItem::MealConsumptionExport(item),
            MeasurementCategory::PlannedMeal => WorkItem::PlannedMealExport(item),
            MeasurementCategory::BeverageConsumption => WorkItem::BeverageConsumptionExport(item),
            MeasurementCategory::AlcoholConsumption => WorkItem::AlcoholConsumptionExport(item),
        }
    }

    /// Create a daily average export job; `None` for categories without averages
    pub fn daily_average_export(
        category: MeasurementCategory,
        person_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        file_name: impl Into<String>,
    ) -> Option<Self> {
        match category {
            MeasurementCategory::BloodPressure => {
                Some(WorkItem::DailyAverageBloodPressureExport(
                    DailyAverageExportWorkItem::new(
                        WorkItemKind::DailyAverageBloodPressureExport.default_job_name(),
                        person_id,
                        from,
                        to,
                        file_name,
                    ),
                ))
            }
            MeasurementCategory::BloodOxygenSaturation => {
                Some(WorkItem::DailyAverageBloodOxygenSaturationExport(
                    DailyAverageExportWorkItem::new(
                        WorkItemKind::DailyAverageBloodOxygenSaturationExport.default_job_name(),
                        person_id,
                        from,
                        to,
                        file_name,
                    ),
                ))
            }
            _ => None,
        }
    }

    /// Create a purge of planned meals dated before `cutoff` (today if `None`)
    pub fn purge_planned_meals(person_id: i64, cutoff: Option<NaiveDate>) -> Self {
        WorkItem::PlannedMealPurge(PlannedMealPurgeWorkItem::new(person_id, cutoff))
    }

    pub fn kind(&self) -> WorkItemKind {
        match self {
            WorkItem::Import(_) => WorkItemKind::Import,
            WorkItem::BloodGlucoseExport(_) => WorkItemKind::BloodGlucoseExport,
            WorkItem::BloodPressureExport(_) => WorkItemKind::BloodPressureExport,
            WorkItem::DailyAverageBloodPressureExport(_) => {
                WorkItemKind::DailyAverageBloodPressureExport
            }
            WorkItem::BloodOxygenSaturationExport(_) => WorkItemKind::BloodOxygenSaturationExport,
            WorkItem::DailyAverageBloodOxygenSaturationExport(_) => {
                WorkItemKind::DailyAverageBloodOxygenSaturationExport
            }
            WorkItem::CholesterolExport(_) => WorkItemKind::CholesterolExport,
            WorkItem::ExerciseExport(_) => WorkItemKind::ExerciseExport,
            WorkItem::WeightExport(_) => WorkItemKind::WeightExport,
            WorkItem::MealConsumptionExport(_) => WorkItemKind::MealConsumptionExport,
            WorkItem::PlannedMealExport(_) => WorkItemKind::PlannedMealExport,
            WorkItem::BeverageConsumptionExport(_) => WorkItemKind::BeverageConsumptionExport,
            WorkItem::AlcoholConsumptionExport(_) => WorkItemKind::AlcoholConsumptionExport,
            WorkItem::PlannedMealPurge(_) => WorkItemKind::PlannedMealPurge,
        }
    }

    pub fn job_name(&self) -> &str {
        match self {
            WorkItem::Import(item) => &item.job_name,
            WorkItem::PlannedMealPurge(item) => &item.job_name,
            WorkItem::DailyAverageBloodPressureExport(item)
            | WorkItem::DailyAverageBloodOxygenSaturationExport(item) => &item.job_name,
            WorkItem::BloodGlucoseExport(item)
            | WorkItem::BloodPressureExport(item)
            | WorkItem::BloodOxygenSaturationExport(item)
            | WorkItem::CholesterolExport(item)
            | WorkItem::ExerciseExport(item)
            | WorkItem::WeightExport(item)
            | WorkItem::MealConsumptionExport(item)
            | WorkItem::PlannedMealExport(item)
            | WorkItem::BeverageConsumptionExport(item)
            | WorkItem::AlcoholConsumptionExport(item) => &item.job_name,
        }
    }

    /// Audit description of the job's inputs, stored with its status.
    /// Import content is summarised rather than copied.
    pub fn parameters(&self) -> String {
        let value = match self {
            WorkItem::Import(item) => json!({
                "category": item.category,
                "content_length": item.content.len(),
                "lines": item.content.lines().filter(|l| !l.trim().is_empty()).count(),
            }),
            WorkItem::PlannedMealPurge(item) => json!({
                "person_id": item.person_id,
                "cutoff": item.cutoff,
            }),
            WorkItem::DailyAverageBloodPressureExport(item)
            | WorkItem::DailyAverageBloodOxygenSaturationExport(item) => json!({
                "person_id": item.person_id,
                "from": item.from,
                "to": item.to,
                "file_name": item.file_name,
            }),
            WorkItem::BloodGlucoseExport(item)
            | WorkItem::BloodPressureExport(item)
            | WorkItem::BloodOxygenSaturationExport(item)
            | WorkItem::CholesterolExport(item)
            | WorkItem::ExerciseExport(item)
            | WorkItem::WeightExport(item)
            | WorkItem::MealConsumptionExport(item)
            | WorkItem::PlannedMealExport(item)
            | WorkItem::BeverageConsumptionExport(item)
            | WorkItem::AlcoholConsumptionExport(item) => json!({
                "person_id": item.person_id,
                "from": item.from,
                "to": item.to,
                "file_name": item.file_name,
            }),
        };

        value.to_string()
    }
}

/// A submitted work item and the id its job status is recorded under.
///
/// Not `Clone`: a second run of the same item needs a new `QueuedJob`.
#[derive(Debug, PartialEq)]
pub struct QueuedJob {
    pub id: Uuid,
    pub item: WorkItem,
}

impl QueuedJob {
    pub fn new(item: impl Into<WorkItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item: item.into(),
        }
    }

    pub fn kind(&self) -> WorkItemKind {
        self.item.kind()
    }
}
