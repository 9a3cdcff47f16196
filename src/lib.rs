pub mod modules;
mod schema;
pub mod shared;

use modules::data_exchange::{
    CsvMeasurementExporter, CsvMeasurementImporter, InMemoryMeasurementStore, MeasurementStore,
    MeasurementStorePurger,
};
use modules::jobs::{
    InMemoryJobStatusRepository, JobContext, JobHost, JobStatusRepository,
    JobStatusRepositoryImpl,
};
use shared::{AppConfig, DatabaseState};
use std::sync::Arc;

/// Pick the job status store: PostgreSQL when reachable, memory otherwise
pub fn status_repository(db_state: &DatabaseState) -> Arc<dyn JobStatusRepository> {
    match db_state.get_database() {
        Ok(database) => {
            log_info!("Job statuses will be stored in PostgreSQL");
            Arc::new(JobStatusRepositoryImpl::new(database.pool().clone()))
        }
        Err(e) => {
            log_warn!("{}; job statuses will be kept in memory", e);
            Arc::new(InMemoryJobStatusRepository::new())
        }
    }
}

/// Wire collaborators and start one worker per job queue.
///
/// Must be called from within a tokio runtime.
pub fn start_job_host(config: &AppConfig) -> JobHost {
    let db_state = DatabaseState::initialize(config.database_url.as_deref());
    log_info!("{}", db_state.status_message());

    // Measurement persistence belongs to the main application; this process
    // only needs somewhere for imports to land, exports to read from and
    // purges to remove from.
    let store: Arc<dyn MeasurementStore> = Arc::new(InMemoryMeasurementStore::new());

    let context = JobContext::new(
        Arc::new(CsvMeasurementImporter::new(store.clone())),
        Arc::new(CsvMeasurementExporter::new(store.clone())),
        Arc::new(MeasurementStorePurger::new(store)),
        config.export_path.clone(),
    );

    JobHost::start(status_repository(&db_state), context)
}

/// Run the job host until Ctrl-C
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let host = start_job_host(&config);

    tokio::signal::ctrl_c().await?;
    log_info!("Shutdown requested");

    for stats in host.worker_statistics() {
        log_debug!(
            "Worker [{}]: {} processed, {} succeeded, {} failed, {} pending",
            stats.kind,
            stats.processed_jobs,
            stats.succeeded_jobs,
            stats.failed_jobs,
            stats.pending_jobs
        );
    }

    host.shutdown().await;
    Ok(())
}
