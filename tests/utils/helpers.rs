/// Test helper functions and service builders
use healthtracker_lib::modules::data_exchange::{
    CsvMeasurementExporter, CsvMeasurementImporter, InMemoryMeasurementStore,
    MeasurementStorePurger,
};
use healthtracker_lib::modules::jobs::{
    BackgroundQueue, BackgroundWorker, DataExporter, DataImporter, InMemoryJobStatusRepository,
    JobContext, JobStatus, JobStatusRepository, QueuedJob, WorkItem, WorkItemKind,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Context backed by the real CSV collaborators and an in-memory store
pub fn csv_context(export_dir: &Path) -> (JobContext, Arc<InMemoryMeasurementStore>) {
    let store = Arc::new(InMemoryMeasurementStore::new());
    let context = JobContext::new(
        Arc::new(CsvMeasurementImporter::new(store.clone())),
        Arc::new(CsvMeasurementExporter::new(store.clone())),
        Arc::new(MeasurementStorePurger::new(store.clone())),
        export_dir,
    );
    (context, store)
}

pub fn context_with(
    importer: impl DataImporter + 'static,
    exporter: impl DataExporter + 'static,
) -> JobContext {
    let purger = MeasurementStorePurger::new(Arc::new(InMemoryMeasurementStore::new()));
    JobContext::new(
        Arc::new(importer),
        Arc::new(exporter),
        Arc::new(purger),
        "/tmp/health-exports",
    )
}

pub struct RunningWorker {
    pub queue: Arc<BackgroundQueue<QueuedJob>>,
    pub worker: Arc<BackgroundWorker>,
    pub statuses: Arc<dyn JobStatusRepository>,
    pub shutdown: CancellationToken,
    pub handle: JoinHandle<()>,
}

impl RunningWorker {
    pub fn submit(&self, item: WorkItem) -> Uuid {
        let job = QueuedJob::new(item);
        let id = job.id;
        self.queue.enqueue(job);
        id
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("worker did not stop")
            .expect("worker task panicked");
    }
}

/// Spawn a single worker over a fresh queue with in-memory statuses
pub fn spawn_worker(kind: WorkItemKind, context: JobContext) -> RunningWorker {
    spawn_worker_with_statuses(kind, context, Arc::new(InMemoryJobStatusRepository::new()))
}

pub fn spawn_worker_with_statuses(
    kind: WorkItemKind,
    context: JobContext,
    statuses: Arc<dyn JobStatusRepository>,
) -> RunningWorker {
    let queue = Arc::new(BackgroundQueue::new(kind.to_string()));
    let shutdown = CancellationToken::new();
    let worker = Arc::new(BackgroundWorker::new(
        kind,
        queue.clone(),
        statuses.clone(),
        Arc::new(context),
        shutdown.clone(),
    ));
    let handle = tokio::spawn(worker.clone().run());

    RunningWorker {
        queue,
        worker,
        statuses,
        shutdown,
        handle,
    }
}

/// Poll until the job has a completed status
pub async fn wait_for_completion(statuses: &Arc<dyn JobStatusRepository>, id: Uuid) -> JobStatus {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(status) = statuses.get_by_id(id).await.unwrap() {
                if status.end.is_some() {
                    return status;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not complete in time")
}
