/// Tests for the in-process job queue and job submission
///
/// Tests cover:
/// - FIFO ordering per queue
/// - Consumers suspending on an empty queue
/// - Concurrent producers (no loss, no duplication)
/// - Routing of submitted items by kind
use healthtracker_lib::modules::jobs::{BackgroundQueue, JobQueues, WorkItem, WorkItemKind};
use healthtracker_lib::shared::domain::MeasurementCategory;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_pending, assert_ready_eq, task};

#[tokio::test]
async fn dequeue_returns_items_in_enqueue_order() {
    let queue = BackgroundQueue::new("fifo");
    for n in 0..100 {
        queue.enqueue(n);
    }

    for expected in 0..100 {
        assert_eq!(queue.dequeue().await, expected);
    }
    assert!(queue.is_empty());
}

#[test]
fn dequeue_suspends_until_an_item_arrives() {
    let queue = BackgroundQueue::new("suspend");
    let mut dequeue = task::spawn(queue.dequeue());

    assert_pending!(dequeue.poll());
    assert_pending!(dequeue.poll());

    queue.enqueue("first");
    assert!(dequeue.is_woken());
    assert_ready_eq!(dequeue.poll(), "first");
}

#[test]
fn dropped_dequeue_does_not_lose_items() {
    let queue = BackgroundQueue::new("cancel");

    {
        let mut abandoned = task::spawn(queue.dequeue());
        assert_pending!(abandoned.poll());
    }

    queue.enqueue(42);
    let mut dequeue = task::spawn(queue.dequeue());
    assert_ready_eq!(dequeue.poll(), 42);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_lose_nothing_and_duplicate_nothing() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 250;

    let queue = Arc::new(BackgroundQueue::new("concurrent"));

    let consumer = {
        let queue = queue.clone();
        tokio::spawn(async move {
            let mut seen = Vec::with_capacity(PRODUCERS * PER_PRODUCER);
            while seen.len() < PRODUCERS * PER_PRODUCER {
                seen.push(queue.dequeue().await);
            }
            seen
        })
    };

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let queue = queue.clone();
            tokio::spawn(async move {
                for n in 0..PER_PRODUCER {
                    queue.enqueue((producer, n));
                    if n % 50 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();

    for producer in producers {
        producer.await.unwrap();
    }

    let seen = tokio::time::timeout(Duration::from_secs(10), consumer)
        .await
        .expect("consumer stalled")
        .unwrap();

    let unique: HashSet<_> = seen.iter().copied().collect();
    assert_eq!(unique.len(), PRODUCERS * PER_PRODUCER);

    // Each producer's own items stay in order
    for producer in 0..PRODUCERS {
        let order: Vec<usize> = seen
            .iter()
            .filter(|(p, _)| *p == producer)
            .map(|(_, n)| *n)
            .collect();
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
    }
    assert!(queue.is_empty());
}

#[test]
fn submit_routes_each_kind_to_its_own_queue() {
    let queues = JobQueues::new();
    let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let mut items = vec![WorkItem::import(MeasurementCategory::Weight, "x")];
    items.extend(
        MeasurementCategory::ALL
            .iter()
            .map(|category| WorkItem::export(*category, 1, None, None, "out.csv")),
    );
    items.extend(
        MeasurementCategory::ALL
            .iter()
            .filter_map(|category| {
                WorkItem::daily_average_export(*category, 1, day, day, "avg.csv")
            }),
    );
    items.push(WorkItem::purge_planned_meals(1, None));
    assert_eq!(items.len(), WorkItemKind::COUNT);

    let expected: Vec<(WorkItemKind, uuid::Uuid)> = items
        .into_iter()
        .map(|item| (item.kind(), queues.submit(item)))
        .collect();

    for (kind, id) in expected {
        let queue = queues.queue(kind);
        assert_eq!(queue.len(), 1, "queue {}", kind);
        assert_eq!(queue.try_dequeue().unwrap().id, id);
    }
}
