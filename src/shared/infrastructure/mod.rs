/// Shared infrastructure concerns
///
/// Database plumbing shared by every module that persists state.
pub mod database;
pub mod database_state;

pub use database::{Database, DbPool};
pub use database_state::DatabaseState;
