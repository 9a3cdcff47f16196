/// Database test utilities with singleton pattern
///
/// Database-backed tests run only when TEST_DATABASE_URL is set; callers get
/// `None` otherwise and skip themselves.
use diesel::prelude::*;
use healthtracker_lib::shared::infrastructure::{Database, DbPool};
use std::sync::{Mutex, OnceLock};

static DB_POOL: OnceLock<Option<DbPool>> = OnceLock::new();

/// Get or create the shared, migrated test pool
pub fn get_test_db_pool() -> Option<DbPool> {
    DB_POOL
        .get_or_init(|| {
            dotenvy::dotenv().ok();
            let test_db_url = std::env::var("TEST_DATABASE_URL").ok()?;

            let database =
                Database::new(&test_db_url).expect("Failed to create test database pool");
            database
                .run_migrations()
                .expect("Failed to run migrations on test database");

            Some(database.pool().clone())
        })
        .clone()
}

/// Clean all test tables - use at the start of each test
pub fn clean_test_db(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection");

    diesel::sql_query("TRUNCATE TABLE job_statuses")
        .execute(&mut conn)
        .expect("Failed to clean job_statuses");
}

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Acquire test lock to ensure database tests run serially
pub fn acquire_test_lock() -> std::sync::MutexGuard<'static, ()> {
    // Handle poisoned mutex by recovering from panic
    match TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
