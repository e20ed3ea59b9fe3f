// ABOUTME: Task management with search and tag association
// ABOUTME: Provides CRUD operations and the combined-fetch query resolver

pub mod storage;
pub mod types;

pub use storage::TaskStorage;
pub use types::{Task, TaskCreateInput, TaskFilter, TaskStatus, TaskUpdateInput};
