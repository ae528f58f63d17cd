//! Task record as seen by the ordering engine

use super::ids::{ProjectId, TaskId};
use super::lane::Lane;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task/card on the board.
///
/// `status` and `position` are only changed through board operations.
/// `title` and `description` belong to the task-management surface and are
/// carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,

    /// The lane this task occupies
    pub status: Lane,

    /// Ordering key within the lane; only its relative order matters
    pub position: f64,

    /// Row version, bumped on every status/position change
    #[serde(default)]
    pub version: u64,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new, not yet placed task. The store assigns the version on insert.
    pub fn new(project: impl Into<ProjectId>, title: impl Into<String>, status: Lane) -> Self {
        Self {
            id: TaskId::new(),
            project: project.into(),
            title: title.into(),
            description: String::new(),
            status,
            position: 0.0,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    /// Use a caller-chosen id
    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the ordering key
    pub fn with_position(mut self, position: f64) -> Self {
        self.position = position;
        self
    }
}
