// ABOUTME: Task type definitions
// ABOUTME: Structures for tasks, their status, and command inputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use taskboard_tags::TagName;

/// Completion status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// A to-do item with its associated tag names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub status: TaskStatus,
    pub tags: Vec<TagName>,
}

/// Input for creating a task. Status always starts as pending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreateInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating a task. Every field is replaced unconditionally;
/// the tag list replaces the entire association set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Filters for the query resolver. Both constraints are ANDed when
/// present; neither present means a full listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub q: Option<String>,
    pub tag: Option<String>,
}
