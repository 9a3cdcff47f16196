pub mod job_status;
pub mod ports;
pub mod repository;
pub mod work_item;

pub use job_status::{JobOutcome, JobStatus, JobStatusFilter};
pub use ports::{
    DataExporter, DataImporter, DataPurger, ExportAggregation, ExportRequest, ExportSummary,
    ImportSummary, PurgeSummary,
};
pub use repository::{JobStatistics, JobStatusRepository};
pub use work_item::{
    DailyAverageExportWorkItem, ImportWorkItem, MeasurementExportWorkItem,
    PlannedMealPurgeWorkItem, QueuedJob, WorkItem, WorkItemKind,
};
