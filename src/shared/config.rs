use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::parse_level;
use log::LevelFilter;
use std::env;
use std::path::PathBuf;

const DEFAULT_EXPORT_PATH: &str = "./exports";

/// Process-wide settings, read from the environment (and `.env` via dotenvy)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL URL for durable job statuses; `None` keeps statuses in memory
    pub database_url: Option<String>,
    /// Directory export jobs write their files into
    pub export_path: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let export_path = non_empty("EXPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH));

        if export_path.is_file() {
            return Err(AppError::ConfigurationError(format!(
                "EXPORT_PATH {} is a file, expected a directory",
                export_path.display()
            )));
        }

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            export_path,
            log_level: non_empty("LOG_LEVEL")
                .map(|level| parse_level(&level))
                .unwrap_or(LevelFilter::Info),
        })
    }
}
