// ABOUTME: Database connection management and storage initialization
// ABOUTME: Provides shared access to the SQLite pool and storage layers

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use taskboard_storage::StorageError;
use taskboard_tags::TagStorage;
use taskboard_tasks::TaskStorage;

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub task_storage: Arc<TaskStorage>,
    pub tag_storage: Arc<TagStorage>,
}

impl DbState {
    /// Create new database state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        let task_storage = Arc::new(TaskStorage::new(pool.clone()));
        let tag_storage = Arc::new(TagStorage::new(pool.clone()));

        Self {
            pool,
            task_storage,
            tag_storage,
        }
    }

    /// Initialize database state with default configuration
    pub async fn init() -> Result<Self, StorageError> {
        Self::init_with_path(None).await
    }

    /// Initialize database state with optional custom database path
    pub async fn init_with_path(database_path: Option<PathBuf>) -> Result<Self, StorageError> {
        let database_path = database_path.unwrap_or_else(|| PathBuf::from("taskboard.db"));
        let pool = taskboard_storage::connect(&database_path).await?;
        Ok(Self::new(pool))
    }

    /// Initialize database state from a database URL (tests use
    /// `sqlite::memory:`)
    pub async fn init_with_url(database_url: &str) -> Result<Self, StorageError> {
        let pool = taskboard_storage::connect_url(database_url).await?;
        Ok(Self::new(pool))
    }
}
