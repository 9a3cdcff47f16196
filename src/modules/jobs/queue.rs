/// Unbounded in-process FIFO with an awaiting consumer side
///
/// Producers never block. `dequeue` parks the consumer on a `Notify` until an
/// item arrives, so idle workers cost nothing and pick up work immediately.
use crate::log_debug;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

pub struct BackgroundQueue<T> {
    name: String,
    items: Mutex<VecDeque<T>>,
    available: Notify,
}

impl<T: Send> BackgroundQueue<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append an item and wake a waiting consumer
    pub fn enqueue(&self, item: T) {
        let depth = {
            let mut items = self.lock();
            items.push_back(item);
            items.len()
        };

        self.available.notify_one();
        log_debug!("Queue [{}]: item enqueued (depth {})", self.name, depth);
    }

    /// Remove the oldest item, waiting while the queue is empty.
    ///
    /// Cancel safe: an item is only taken off the queue in the same poll that
    /// returns it.
    pub async fn dequeue(&self) -> T {
        loop {
            if let Some(item) = self.try_dequeue() {
                return item;
            }

            // A permit stored by notify_one before we got here wakes us at once
            self.available.notified().await;
        }
    }

    pub fn try_dequeue(&self) -> Option<T> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        // A panic while holding the lock cannot leave the deque half-updated
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
