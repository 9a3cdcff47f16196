use log::{debug, error, info, warn, LevelFilter};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the logging system
/// This should be called once at application startup
pub fn init_logger(level: LevelFilter) {
    INIT.call_once(|| {
        let result = env_logger::Builder::from_default_env()
            .filter_level(level)
            .filter_module("healthtracker_lib", level.max(LevelFilter::Info))
            .filter_module("diesel", LevelFilter::Warn) // Reduce diesel noise
            .filter_module("tokio", LevelFilter::Warn) // Reduce tokio noise
            .format_timestamp_secs()
            .format_module_path(false)
            .try_init();

        match result {
            Ok(()) => info!("Logging system initialized at level {}", level),
            Err(e) => eprintln!("Logger already installed, keeping existing one: {}", e),
        }
    });
}

/// Parse a textual log level, falling back to `Info`
pub fn parse_level(value: &str) -> LevelFilter {
    value.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Macro for structured logging with context
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// Structured logging helpers for common patterns
pub struct LogContext;

impl LogContext {
    /// Log database operations
    pub fn db_operation(operation: &str, table: &str, duration_ms: Option<u64>) {
        match duration_ms {
            Some(duration) => debug!("DB: {} on {} completed in {}ms", operation, table, duration),
            None => debug!("DB: Starting {} on {}", operation, table),
        }
    }

    /// Log the start of a background job
    pub fn job_started(queue: &str, job_id: &str, name: &str) {
        info!("Job [{}] {} '{}' started", queue, job_id, name);
    }

    /// Log the outcome of a background job
    pub fn job_finished(queue: &str, job_id: &str, duration_ms: u64, error: Option<&str>) {
        match error {
            None => info!(
                "Job [{}] {} completed in {}ms",
                queue, job_id, duration_ms
            ),
            Some(message) => warn!(
                "Job [{}] {} failed after {}ms: {}",
                queue, job_id, duration_ms, message
            ),
        }
    }

    /// Log import operations
    pub fn import_progress(category: &str, imported: usize, total: usize) {
        info!("Import: [{}/{}] {} records stored", imported, total, category);
    }

    /// Log export operations
    pub fn export_written(category: &str, records: usize, file: &str) {
        info!("Export: {} {} records written to {}", records, category, file);
    }

    /// Log errors with context
    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        error!("{}: {}", context, error);
    }

    /// Log performance metrics
    pub fn performance_metric(operation: &str, duration_ms: u64, additional_info: Option<&str>) {
        match additional_info {
            Some(info) => info!(
                "Performance: {} took {}ms ({})",
                operation, duration_ms, info
            ),
            None => info!("Performance: {} took {}ms", operation, duration_ms),
        }
    }
}

/// Helper for timing operations
pub struct TimedOperation {
    start: std::time::Instant,
    operation: String,
}

impl TimedOperation {
    pub fn new(operation: &str) -> Self {
        debug!("Starting: {}", operation);
        Self {
            start: std::time::Instant::now(),
            operation: operation.to_string(),
        }
    }

    /// Elapsed time without logging
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn finish(self) -> u64 {
        let duration = self.elapsed_ms();
        LogContext::performance_metric(&self.operation, duration, None);
        duration
    }

    pub fn finish_with_info(self, info: &str) -> u64 {
        let duration = self.elapsed_ms();
        LogContext::performance_metric(&self.operation, duration, Some(info));
        duration
    }
}
