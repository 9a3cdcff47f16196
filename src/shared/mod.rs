// Shared kernel used by the jobs and data exchange modules

pub mod application; // Pagination
pub mod config; // Environment driven settings
pub mod domain; // Shared value objects
pub mod errors; // Shared error types
pub mod infrastructure; // Database plumbing
pub mod utils; // Logging

pub use config::AppConfig;
pub use infrastructure::database::Database;
pub use infrastructure::database_state::DatabaseState;
