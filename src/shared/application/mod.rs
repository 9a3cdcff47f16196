/// Shared application layer patterns
///
/// Application-level abstractions used across modules.
pub mod pagination;

pub use pagination::*;
