/// Job status repository tests
///
/// Every check runs against the in-memory repository and, when
/// TEST_DATABASE_URL is set, against PostgreSQL as well.
///
/// Tests cover:
/// - Status lifecycle (start, complete, never reopened)
/// - Listing order, filters and pagination
/// - Statistics
mod utils;

use chrono::{DateTime, Duration, TimeZone, Utc};
use healthtracker_lib::modules::jobs::{
    InMemoryJobStatusRepository, JobOutcome, JobStatusFilter, JobStatusRepository,
    JobStatusRepositoryImpl,
};
use healthtracker_lib::shared::application::PaginationParams;
use healthtracker_lib::shared::errors::AppError;
use utils::db;
use uuid::Uuid;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// Run `check` against each available repository implementation
async fn for_each_repository<F, Fut>(check: F)
where
    F: Fn(Box<dyn JobStatusRepository>) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    check(Box::new(InMemoryJobStatusRepository::new())).await;

    let Some(pool) = db::get_test_db_pool() else {
        eprintln!("TEST_DATABASE_URL not set; skipping PostgreSQL repository checks");
        return;
    };
    let _guard = db::acquire_test_lock();
    db::clean_test_db(&pool);
    check(Box::new(JobStatusRepositoryImpl::new(pool))).await;
}

#[tokio::test]
async fn start_records_running_status() {
    for_each_repository(|repo| async move {
        let id = Uuid::new_v4();
        let started = repo
            .start(id, "Weight import", r#"{"category":"weight"}"#, base_time())
            .await
            .unwrap();

        assert_eq!(started.id, id);
        assert_eq!(started.outcome(), JobOutcome::Running);
        assert_eq!(started.start, base_time());

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched, started);
    })
    .await;
}

#[tokio::test]
async fn complete_sets_end_and_error() {
    for_each_repository(|repo| async move {
        let ok = Uuid::new_v4();
        let failed = Uuid::new_v4();
        repo.start(ok, "Export", "{}", base_time()).await.unwrap();
        repo.start(failed, "Import", "{}", base_time()).await.unwrap();

        let ok = repo
            .complete(ok, base_time() + Duration::seconds(5), None)
            .await
            .unwrap();
        assert_eq!(ok.outcome(), JobOutcome::Succeeded);
        assert_eq!(ok.end, Some(base_time() + Duration::seconds(5)));

        let failed = repo
            .complete(
                failed,
                base_time() + Duration::seconds(1),
                Some("Invalid record format at line 2"),
            )
            .await
            .unwrap();
        assert_eq!(failed.outcome(), JobOutcome::Failed);
        assert_eq!(
            failed.error.as_deref(),
            Some("Invalid record format at line 2")
        );
    })
    .await;
}

#[tokio::test]
async fn long_job_names_are_stored_in_full() {
    for_each_repository(|repo| async move {
        let id = Uuid::new_v4();
        let name = format!("Weight import {}", "x".repeat(500));
        repo.start(id, &name, "{}", base_time()).await.unwrap();

        let completed = repo
            .complete(id, base_time() + Duration::seconds(1), None)
            .await
            .unwrap();
        assert_eq!(completed.name, name);
        assert_eq!(completed.outcome(), JobOutcome::Succeeded);

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.name, name);
    })
    .await;
}

#[tokio::test]
async fn completion_before_start_is_clamped() {
    for_each_repository(|repo| async move {
        let id = Uuid::new_v4();
        repo.start(id, "Export", "{}", base_time()).await.unwrap();

        let done = repo
            .complete(id, base_time() - Duration::minutes(1), None)
            .await
            .unwrap();
        assert_eq!(done.end, Some(base_time()));
    })
    .await;
}

#[tokio::test]
async fn completed_status_cannot_be_completed_again() {
    for_each_repository(|repo| async move {
        let id = Uuid::new_v4();
        repo.start(id, "Export", "{}", base_time()).await.unwrap();
        repo.complete(id, base_time(), Some("first")).await.unwrap();

        let second = repo.complete(id, base_time(), None).await;
        assert!(matches!(second, Err(AppError::InvalidInput(_))));

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.error.as_deref(), Some("first"));
    })
    .await;
}

#[tokio::test]
async fn completing_unknown_job_is_not_found() {
    for_each_repository(|repo| async move {
        let result = repo.complete(Uuid::new_v4(), base_time(), None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    })
    .await;
}

#[tokio::test]
async fn list_is_newest_first_and_paginated() {
    for_each_repository(|repo| async move {
        for minute in 0..5 {
            repo.start(
                Uuid::new_v4(),
                &format!("Job {}", minute),
                "{}",
                base_time() + Duration::minutes(minute),
            )
            .await
            .unwrap();
        }

        let first_page = repo
            .list(&JobStatusFilter::default(), PaginationParams::new(1, 2))
            .await
            .unwrap();
        assert_eq!(first_page.total_count, 5);
        assert_eq!(first_page.total_pages, 3);
        let names: Vec<&str> = first_page.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Job 4", "Job 3"]);

        let last_page = repo
            .list(&JobStatusFilter::default(), PaginationParams::new(3, 2))
            .await
            .unwrap();
        assert_eq!(last_page.items.len(), 1);
        assert_eq!(last_page.items[0].name, "Job 0");
    })
    .await;
}

#[tokio::test]
async fn list_filters_by_name_and_start_range() {
    for_each_repository(|repo| async move {
        for minute in 0..4 {
            let name = if minute % 2 == 0 { "Weight import" } else { "Weight Measurement Export" };
            repo.start(
                Uuid::new_v4(),
                name,
                "{}",
                base_time() + Duration::minutes(minute),
            )
            .await
            .unwrap();
        }

        let imports = repo
            .list(
                &JobStatusFilter::default().with_name("Weight import"),
                PaginationParams::all(),
            )
            .await
            .unwrap();
        assert_eq!(imports.total_count, 2);
        assert!(imports.items.iter().all(|s| s.name == "Weight import"));

        let window = repo
            .list(
                &JobStatusFilter::default().started_between(
                    Some(base_time() + Duration::minutes(1)),
                    Some(base_time() + Duration::minutes(2)),
                ),
                PaginationParams::all(),
            )
            .await
            .unwrap();
        assert_eq!(window.total_count, 2);
    })
    .await;
}

#[tokio::test]
async fn statistics_count_outcomes() {
    for_each_repository(|repo| async move {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            repo.start(*id, "Job", "{}", base_time()).await.unwrap();
        }
        repo.complete(ids[0], base_time(), None).await.unwrap();
        repo.complete(ids[1], base_time(), Some("boom")).await.unwrap();
        repo.complete(ids[2], base_time(), None).await.unwrap();

        let stats = repo.get_statistics().await.unwrap();
        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.running_count, 1);
        assert_eq!(stats.succeeded_count, 2);
        assert_eq!(stats.failed_count, 1);
    })
    .await;
}
