// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Handles lookup and find-or-create resolution for tags

use sqlx::{Row, SqlitePool};
use tracing::debug;

use taskboard_storage::StorageError;

use super::types::Tag;

pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tags, ordered by name.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, StorageError> {
        debug!("Fetching all tags");

        let rows = sqlx::query("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_tag).collect()
    }

    /// Get a tag by name (exact match).
    pub async fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, StorageError> {
        debug!("Fetching tag by name: {}", name);

        let row = sqlx::query("SELECT id, name FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_tag).transpose()
    }

    /// Resolve a tag by name, creating it if absent.
    ///
    /// Concurrent resolution of the same new name is serialized by the
    /// unique constraint on `tags.name`: a unique violation during the
    /// insert means another request won the race, so the name is
    /// re-fetched instead of surfacing the error.
    pub async fn find_or_create(&self, name: &str) -> Result<Tag, StorageError> {
        if let Some(tag) = self.get_tag_by_name(name).await? {
            return Ok(tag);
        }

        debug!("Creating tag: {}", name);

        let insert = sqlx::query("INSERT INTO tags (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await;

        match insert {
            Ok(result) => Ok(Tag {
                id: result.last_insert_rowid(),
                name: name.to_string(),
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                debug!("Tag '{}' created concurrently, re-fetching", name);
                self.get_tag_by_name(name)
                    .await?
                    .ok_or_else(|| StorageError::Database(format!("tag '{name}' vanished after unique violation")))
            }
            Err(e) => Err(StorageError::Sqlx(e)),
        }
    }
}

fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag, StorageError> {
    Ok(Tag {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
    })
}
