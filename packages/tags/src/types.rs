// ABOUTME: Tag type definitions
// ABOUTME: Structures for tags used to label tasks

use serde::{Deserialize, Serialize};

/// A label unique by name, attachable to any number of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Wire shape of a tag attached to a task: just the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagName {
    pub name: String,
}

impl TagName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<Tag> for TagName {
    fn from(tag: Tag) -> Self {
        Self { name: tag.name }
    }
}
