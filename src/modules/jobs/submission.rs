/// Job submission: routes work items to the queue for their kind
use crate::modules::jobs::domain::work_item::{QueuedJob, WorkItem, WorkItemKind};
use crate::modules::jobs::queue::BackgroundQueue;
use std::sync::Arc;
use uuid::Uuid;

/// One queue per work item kind. Cheap to clone; clones share the queues.
#[derive(Clone)]
pub struct JobQueues {
    queues: Arc<[Arc<BackgroundQueue<QueuedJob>>; WorkItemKind::COUNT]>,
}

impl Default for JobQueues {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueues {
    pub fn new() -> Self {
        Self {
            queues: Arc::new(
                WorkItemKind::ALL.map(|kind| Arc::new(BackgroundQueue::new(kind.to_string()))),
            ),
        }
    }

    /// Enqueue a work item as a new job and return the job's id.
    ///
    /// Every call creates a new job, even for an item submitted before.
    /// Never blocks and never fails. Field validation happens when the job
    /// runs, and problems show up in the job status.
    pub fn submit(&self, item: impl Into<WorkItem>) -> Uuid {
        let job = QueuedJob::new(item);
        let id = job.id;
        self.queue(job.kind()).enqueue(job);
        id
    }

    pub fn queue(&self, kind: WorkItemKind) -> &Arc<BackgroundQueue<QueuedJob>> {
        &self.queues[kind.index()]
    }

    /// Items waiting in each queue
    pub fn pending(&self) -> Vec<(WorkItemKind, usize)> {
        WorkItemKind::ALL
            .iter()
            .map(|kind| (*kind, self.queue(*kind).len()))
            .collect()
    }
}
