// ABOUTME: Tag management for organizing tasks
// ABOUTME: Provides types and storage layer for unique-by-name tags

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::TagStorage;
pub use types::{Tag, TagName};
