// ABOUTME: HTTP API layer for Taskboard providing REST endpoints and routing
// ABOUTME: Integration layer over the task and tag storage packages

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod response;
pub mod state;
pub mod tasks_handlers;

pub use state::DbState;

/// Creates the tasks API router (nested under /api/tasks)
pub fn create_tasks_router() -> Router<DbState> {
    Router::new()
        .route("/", get(tasks_handlers::list_tasks))
        .route("/", post(tasks_handlers::create_task))
        .route("/{task_id}", put(tasks_handlers::update_task))
        .route("/{task_id}", delete(tasks_handlers::delete_task))
}

/// Creates the full API router with state applied
pub fn create_router(db: DbState) -> Router {
    Router::new()
        .nest("/api/tasks", create_tasks_router())
        .with_state(db)
}
