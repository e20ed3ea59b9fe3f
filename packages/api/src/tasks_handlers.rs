// ABOUTME: HTTP request handlers for task operations
// ABOUTME: Query endpoint plus create/update/delete commands

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use taskboard_tasks::{TaskCreateInput, TaskFilter, TaskUpdateInput};

use super::response::{ApiError, ApiResponse};
use super::state::DbState;

/// Treat an empty query parameter the same as an absent one.
fn normalize(param: Option<String>) -> Option<String> {
    param.filter(|s| !s.is_empty())
}

/// Resolve the task query: optional free-text term and tag filter,
/// returning matching tasks with their tag names.
pub async fn list_tasks(
    State(db): State<DbState>,
    Query(filter): Query<TaskFilter>,
) -> impl IntoResponse {
    let filter = TaskFilter {
        q: normalize(filter.q),
        tag: normalize(filter.tag),
    };

    info!("Listing tasks (q: {:?}, tag: {:?})", filter.q, filter.tag);

    match db.task_storage.search_tasks(&filter).await {
        Ok(tasks) => (StatusCode::OK, ResponseJson(ApiResponse::success(tasks))).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Create a new task
pub async fn create_task(
    State(db): State<DbState>,
    Json(input): Json<TaskCreateInput>,
) -> impl IntoResponse {
    info!("Creating task: '{}'", input.title);

    match db.task_storage.create_task(input).await {
        Ok(task) => (StatusCode::CREATED, ResponseJson(ApiResponse::success(task))).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Update an existing task (full replace, including the tag set)
pub async fn update_task(
    State(db): State<DbState>,
    Path(task_id): Path<i64>,
    Json(input): Json<TaskUpdateInput>,
) -> impl IntoResponse {
    info!("Updating task: {}", task_id);

    match db.task_storage.update_task(task_id, input).await {
        Ok(task) => (StatusCode::OK, ResponseJson(ApiResponse::success(task))).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Delete a task. Reports success even when nothing was deleted; the
/// affected-row count is surfaced in the payload.
pub async fn delete_task(
    State(db): State<DbState>,
    Path(task_id): Path<i64>,
) -> impl IntoResponse {
    info!("Deleting task: {}", task_id);

    match db.task_storage.delete_task(task_id).await {
        Ok(deleted) => {
            if deleted == 0 {
                info!("Delete of task {} affected no rows", task_id);
            }
            (
                StatusCode::OK,
                ResponseJson(ApiResponse::success(serde_json::json!({ "deleted": deleted }))),
            )
                .into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}
