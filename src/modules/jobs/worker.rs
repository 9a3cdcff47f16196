/// Background worker draining one job queue
///
/// Each worker owns one queue. For every job it records a running status,
/// executes the handler, then records the outcome. Failures are captured in
/// the status and never stop the loop; there are no retries.
use crate::modules::jobs::dispatcher::{self, JobContext};
use crate::modules::jobs::domain::job_status::JobStatus;
use crate::modules::jobs::domain::repository::JobStatusRepository;
use crate::modules::jobs::domain::work_item::{QueuedJob, WorkItemKind};
use crate::modules::jobs::queue::BackgroundQueue;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_error, log_info, log_warn};
use chrono::Utc;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct BackgroundWorker {
    kind: WorkItemKind,
    queue: Arc<BackgroundQueue<QueuedJob>>,
    status_repository: Arc<dyn JobStatusRepository>,
    context: Arc<JobContext>,
    shutdown: CancellationToken,
    is_running: AtomicBool,
    processed: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl BackgroundWorker {
    pub fn new(
        kind: WorkItemKind,
        queue: Arc<BackgroundQueue<QueuedJob>>,
        status_repository: Arc<dyn JobStatusRepository>,
        context: Arc<JobContext>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            kind,
            queue,
            status_repository,
            context,
            shutdown,
            is_running: AtomicBool::new(false),
            processed: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> WorkItemKind {
        self.kind
    }

    /// Run the worker loop until shutdown is requested.
    ///
    /// Shutdown is only observed while idle; a job that has been dequeued
    /// always runs to completion and gets its status recorded.
    pub async fn run(self: Arc<Self>) {
        log_info!("Background worker [{}] started", self.kind);
        self.is_running.store(true, Ordering::SeqCst);

        loop {
            let job = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                job = self.queue.dequeue() => job,
            };

            self.process(job).await;
        }

        self.is_running.store(false, Ordering::SeqCst);
        log_info!(
            "Background worker [{}] stopped ({} items left in queue)",
            self.kind,
            self.queue.len()
        );
    }

    /// Execute one queued job and record its status under the job's id.
    ///
    /// Returns the final status as computed by the worker, whether or not
    /// it could be persisted.
    pub async fn process(&self, job: QueuedJob) -> JobStatus {
        let QueuedJob { id, item } = job;
        let queue = self.kind.to_string();
        let job_id = id.to_string();
        let mut status = JobStatus::started(id, item.job_name(), item.parameters(), Utc::now());

        LogContext::job_started(&queue, &job_id, &status.name);

        if let Err(e) = self
            .status_repository
            .start(status.id, &status.name, &status.parameters, status.start)
            .await
        {
            log_error!("Failed to record start of job {}: {}", job_id, e);
        }

        let timer = TimedOperation::new(&format!("job {}", job_id));
        let error = match AssertUnwindSafe(dispatcher::dispatch(&item, &self.context))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(panic) => Some(panic_message(panic.as_ref())),
        };
        let duration_ms = timer.elapsed_ms();

        if let Err(e) = status.complete(Utc::now(), error.as_deref()) {
            log_warn!("Job {} status already closed: {}", job_id, e);
        }

        self.processed.fetch_add(1, Ordering::Relaxed);
        match &status.error {
            None => self.succeeded.fetch_add(1, Ordering::Relaxed),
            Some(_) => self.failed.fetch_add(1, Ordering::Relaxed),
        };

        if let Some(end) = status.end {
            if let Err(e) = self
                .status_repository
                .complete(status.id, end, status.error.as_deref())
                .await
            {
                log_error!("Failed to record completion of job {}: {}", job_id, e);
            }
        }

        LogContext::job_finished(&queue, &job_id, duration_ms, status.error.as_deref());
        status
    }

    pub fn statistics(&self) -> WorkerStatistics {
        WorkerStatistics {
            kind: self.kind,
            is_running: self.is_running.load(Ordering::SeqCst),
            pending_jobs: self.queue.len(),
            processed_jobs: self.processed.load(Ordering::Relaxed),
            succeeded_jobs: self.succeeded.load(Ordering::Relaxed),
            failed_jobs: self.failed.load(Ordering::Relaxed),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    format!("Job panicked: {}", detail)
}

/// Worker statistics for monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatistics {
    pub kind: WorkItemKind,
    pub is_running: bool,
    pub pending_jobs: usize,
    pub processed_jobs: u64,
    pub succeeded_jobs: u64,
    pub failed_jobs: u64,
}
