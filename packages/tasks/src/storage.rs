// ABOUTME: Task storage layer using SQLite
// ABOUTME: Query resolution with combined tag fetch plus create/update/delete

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::{Row, SqlitePool};
use tracing::debug;

use taskboard_storage::StorageError;
use taskboard_tags::{TagName, TagStorage};

use super::types::{Task, TaskCreateInput, TaskFilter, TaskStatus, TaskUpdateInput};

pub struct TaskStorage {
    pool: SqlitePool,
    tags: TagStorage,
    round_trips: AtomicU64,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        let tags = TagStorage::new(pool.clone());
        Self {
            pool,
            tags,
            round_trips: AtomicU64::new(0),
        }
    }

    /// Number of store round-trips this storage has issued directly.
    /// Tests use the delta across a call to assert the bounded-fetch
    /// property of `search_tasks`.
    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::Relaxed)
    }

    fn tick(&self) {
        self.round_trips.fetch_add(1, Ordering::Relaxed);
    }

    /// Resolve a structured query into the matching tasks, each with its
    /// full tag-name list.
    ///
    /// `q` is a case-insensitive substring match over title, description,
    /// and location; `tag` is an exact name match against at least one
    /// associated tag. Both are ANDed when present. Results are ordered
    /// by due date ascending; tasks without a due date sort first
    /// (SQLite's ASC null ordering, consistent but implementation-defined).
    ///
    /// Issues exactly two round-trips regardless of the result size: one
    /// for the task rows, one batched fetch of the tag names for every
    /// matched id.
    pub async fn search_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StorageError> {
        debug!("Searching tasks (q: {:?}, tag: {:?})", filter.q, filter.tag);

        let mut sql = String::from(
            "SELECT DISTINCT t.id, t.title, t.description, t.due_date, t.location, t.status \
             FROM tasks t",
        );

        if filter.tag.is_some() {
            sql.push_str(" JOIN task_tags tt ON tt.task_id = t.id JOIN tags g ON g.id = tt.tag_id");
        }

        let mut conditions = Vec::new();
        if filter.q.is_some() {
            conditions.push("(t.title LIKE ? OR t.description LIKE ? OR t.location LIKE ?)");
        }
        if filter.tag.is_some() {
            conditions.push("g.name = ?");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY t.due_date ASC, t.id ASC");

        let mut query = sqlx::query(&sql);
        if let Some(q) = &filter.q {
            let pattern = format!("%{}%", q);
            query = query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern);
        }
        if let Some(tag) = &filter.tag {
            query = query.bind(tag);
        }

        self.tick();
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut tasks = rows
            .iter()
            .map(row_to_task)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        let mut tag_map = self.fetch_tags_for(&ids).await?;

        for task in &mut tasks {
            if let Some(names) = tag_map.remove(&task.id) {
                task.tags = names;
            }
        }

        Ok(tasks)
    }

    /// Fetch the tag names for a set of task ids in one round-trip.
    async fn fetch_tags_for(
        &self,
        task_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<TagName>>, StorageError> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; task_ids.len()].join(", ");
        let sql = format!(
            "SELECT tt.task_id, g.name FROM task_tags tt \
             JOIN tags g ON g.id = tt.tag_id \
             WHERE tt.task_id IN ({placeholders}) \
             ORDER BY g.name"
        );

        let mut query = sqlx::query(&sql);
        for id in task_ids {
            query = query.bind(id);
        }

        self.tick();
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut map: HashMap<i64, Vec<TagName>> = HashMap::new();
        for row in rows {
            let task_id: i64 = row.try_get("task_id").map_err(StorageError::Sqlx)?;
            let name: String = row.try_get("name").map_err(StorageError::Sqlx)?;
            map.entry(task_id).or_default().push(TagName::new(name));
        }

        Ok(map)
    }

    /// Get a single task by id with its tags.
    pub async fn get_task(&self, task_id: i64) -> Result<Task, StorageError> {
        debug!("Fetching task: {}", task_id);

        self.tick();
        let row = sqlx::query(
            "SELECT id, title, description, due_date, location, status FROM tasks WHERE id = ?",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut task = match row {
            Some(row) => row_to_task(&row)?,
            None => return Err(StorageError::NotFound),
        };

        let mut tag_map = self.fetch_tags_for(&[task_id]).await?;
        if let Some(names) = tag_map.remove(&task_id) {
            task.tags = names;
        }

        Ok(task)
    }

    /// Create a task and associate its tags (find-or-create per name).
    pub async fn create_task(&self, input: TaskCreateInput) -> Result<Task, StorageError> {
        if input.title.trim().is_empty() {
            return Err(StorageError::Validation("title must not be empty".to_string()));
        }

        debug!("Creating task: {}", input.title);

        self.tick();
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, due_date, location, status) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(&input.location)
        .bind(TaskStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let task_id = result.last_insert_rowid();
        self.associate_tags(task_id, &input.tags).await?;

        self.get_task(task_id).await
    }

    /// Full-replace update: every field is overwritten and the tag
    /// association set is rebuilt from the supplied list. Old tags that
    /// drop out of use are left in the tags table.
    pub async fn update_task(
        &self,
        task_id: i64,
        input: TaskUpdateInput,
    ) -> Result<Task, StorageError> {
        if input.title.trim().is_empty() {
            return Err(StorageError::Validation("title must not be empty".to_string()));
        }

        debug!("Updating task: {}", task_id);

        self.tick();
        let exists = sqlx::query("SELECT id FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists.is_none() {
            return Err(StorageError::NotFound);
        }

        self.tick();
        sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, due_date = ?, location = ?, status = ? \
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(&input.location)
        .bind(input.status.as_str())
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.tick();
        sqlx::query("DELETE FROM task_tags WHERE task_id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.associate_tags(task_id, &input.tags).await?;

        self.get_task(task_id).await
    }

    /// Delete a task. Returns the number of rows affected; deleting an
    /// unknown id affects zero rows and is not an error.
    pub async fn delete_task(&self, task_id: i64) -> Result<u64, StorageError> {
        debug!("Deleting task: {}", task_id);

        self.tick();
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }

    /// Resolve and associate a tag-name list. Duplicates collapse by
    /// name identity; blank names are skipped.
    async fn associate_tags(&self, task_id: i64, names: &[String]) -> Result<(), StorageError> {
        let mut seen = HashSet::new();
        for name in names {
            let name = name.trim();
            if name.is_empty() || !seen.insert(name.to_string()) {
                continue;
            }

            let tag = self.tags.find_or_create(name).await?;

            self.tick();
            sqlx::query("INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?, ?)")
                .bind(task_id)
                .bind(tag.id)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        Ok(())
    }
}

fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Result<Task, StorageError> {
    let status: String = row.try_get("status").map_err(StorageError::Sqlx)?;
    let status = TaskStatus::from_str(&status)
        .ok_or_else(|| StorageError::Database(format!("unknown task status '{status}'")))?;

    Ok(Task {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        due_date: row.try_get("due_date").map_err(StorageError::Sqlx)?,
        location: row.try_get("location").map_err(StorageError::Sqlx)?,
        status,
        tags: Vec::new(),
    })
}
