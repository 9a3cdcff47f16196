use super::database::Database;
use crate::shared::errors::AppError;
use std::sync::Arc;

/// Represents the state of the database connection
/// This allows the job host to fall back to in-memory job statuses
/// without terminating the entire application
#[derive(Debug, Clone)]
pub enum DatabaseState {
    /// Database is available, migrated and ready for use
    Available(Arc<Database>),
    /// Database is unavailable with the reason for failure
    Unavailable { reason: String },
    /// No database URL was configured
    NotConfigured,
}

impl DatabaseState {
    /// Connect and migrate, recording the failure instead of returning it
    pub fn initialize(database_url: Option<&str>) -> Self {
        let Some(url) = database_url else {
            log::warn!("DATABASE_URL not set; job statuses will not survive a restart");
            return DatabaseState::NotConfigured;
        };

        let database = match Database::new(url) {
            Ok(db) => db,
            Err(e) => {
                log::error!("Database initialization failed: {}", e);
                return DatabaseState::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        match database.run_migrations() {
            Ok(applied) => {
                log::info!("Database migrations completed ({} applied)", applied);
                DatabaseState::Available(Arc::new(database))
            }
            Err(e) => {
                log::error!("Failed to run database migrations: {}", e);
                DatabaseState::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Get the database if available, otherwise return an error
    pub fn get_database(&self) -> Result<Arc<Database>, AppError> {
        match self {
            DatabaseState::Available(db) => Ok(Arc::clone(db)),
            DatabaseState::Unavailable { reason } => Err(AppError::ServiceUnavailable(format!(
                "Database unavailable: {}",
                reason
            ))),
            DatabaseState::NotConfigured => Err(AppError::ServiceUnavailable(
                "Database is not configured".to_string(),
            )),
        }
    }

    /// Get a user-friendly status message for the database state
    pub fn status_message(&self) -> String {
        match self {
            DatabaseState::Available(_) => "Database connected".to_string(),
            DatabaseState::Unavailable { reason } => format!("Database unavailable: {}", reason),
            DatabaseState::NotConfigured => "Database not configured".to_string(),
        }
    }
}
