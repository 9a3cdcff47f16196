/// Owns the queues and the worker tasks consuming them
use crate::modules::jobs::dispatcher::JobContext;
use crate::modules::jobs::domain::job_status::JobStatus;
use crate::modules::jobs::domain::repository::JobStatusRepository;
use crate::modules::jobs::domain::work_item::{WorkItem, WorkItemKind};
use crate::modules::jobs::submission::JobQueues;
use crate::modules::jobs::worker::{BackgroundWorker, WorkerStatistics};
use crate::shared::errors::AppResult;
use crate::{log_error, log_info};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub struct JobHost {
    queues: JobQueues,
    status_repository: Arc<dyn JobStatusRepository>,
    workers: Vec<Arc<BackgroundWorker>>,
    handles: Vec<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl JobHost {
    /// Spawn one worker per queue on the current tokio runtime
    pub fn start(status_repository: Arc<dyn JobStatusRepository>, context: JobContext) -> Self {
        let queues = JobQueues::new();
        let context = Arc::new(context);
        let shutdown = CancellationToken::new();

        let workers: Vec<Arc<BackgroundWorker>> = WorkItemKind::ALL
            .iter()
            .map(|kind| {
                Arc::new(BackgroundWorker::new(
                    *kind,
                    queues.queue(*kind).clone(),
                    status_repository.clone(),
                    context.clone(),
                    shutdown.child_token(),
                ))
            })
            .collect();

        let handles = workers
            .iter()
            .map(|worker| tokio::spawn(worker.clone().run()))
            .collect();

        log_info!(
            "Job host started {} workers, exporting to {}",
            workers.len(),
            context.export_path.display()
        );

        Self {
            queues,
            status_repository,
            workers,
            handles,
            shutdown,
        }
    }

    /// Handle for submitting jobs from other tasks
    pub fn submitter(&self) -> JobQueues {
        self.queues.clone()
    }

    pub fn submit(&self, item: impl Into<WorkItem>) -> Uuid {
        self.queues.submit(item)
    }

    pub fn status_repository(&self) -> Arc<dyn JobStatusRepository> {
        self.status_repository.clone()
    }

    pub async fn job_status(&self, id: Uuid) -> AppResult<Option<JobStatus>> {
        self.status_repository.get_by_id(id).await
    }

    pub fn worker_statistics(&self) -> Vec<WorkerStatistics> {
        self.workers.iter().map(|worker| worker.statistics()).collect()
    }

    /// Stop all workers once their current job (if any) has finished.
    /// Items still queued are dropped.
    pub async fn shutdown(self) {
        log_info!("Job host shutting down");
        self.shutdown.cancel();

        for result in futures::future::join_all(self.handles).await {
            if let Err(e) = result {
                log_error!("Worker task ended abnormally: {}", e);
            }
        }

        let abandoned: usize = self.queues.pending().iter().map(|(_, n)| n).sum();
        log_info!("Job host stopped ({} queued items discarded)", abandoned);
    }
}
