/// Background job system module
///
/// Deferred measurement imports, exports and purges run here, off the caller's path:
/// - Domain: work items, job status records, repository and collaborator traits
/// - Infrastructure: Diesel and in-memory job status repositories
/// - Queue / Worker / Dispatcher: one in-process queue and worker per job kind
/// - Submission / Host: routing of new items and worker lifecycle
pub mod dispatcher;
pub mod domain;
pub mod host;
pub mod infrastructure;
pub mod queue;
pub mod submission;
pub mod worker;

// Re-exports for easy access
pub use dispatcher::JobContext;
pub use domain::{
    job_status::{JobOutcome, JobStatus, JobStatusFilter},
    ports::{
        DataExporter, DataImporter, DataPurger, ExportAggregation, ExportRequest,
        ExportSummary, ImportSummary, PurgeSummary,
    },
    repository::{JobStatistics, JobStatusRepository},
    work_item::{
        DailyAverageExportWorkItem, ImportWorkItem, MeasurementExportWorkItem,
        PlannedMealPurgeWorkItem, QueuedJob, WorkItem, WorkItemKind,
    },
};
pub use host::JobHost;
pub use infrastructure::{InMemoryJobStatusRepository, JobStatusRepositoryImpl};
pub use queue::BackgroundQueue;
pub use submission::JobQueues;
pub use worker::{BackgroundWorker, WorkerStatistics};
