//! Outbound "task moved" fact

use super::ids::{ActorId, ProjectId, TaskId};
use super::lane::Lane;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emitted after a move commits, for activity feeds and notifications.
/// The engine does not persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMoved {
    pub task_id: TaskId,
    pub project: ProjectId,
    pub from: Lane,
    pub to: Lane,
    /// Index within the destination lane after the move
    pub index: usize,
    pub position: f64,
    /// Row version after the move
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
    pub timestamp: DateTime<Utc>,
    /// The destination lane was renumbered to make room
    #[serde(default)]
    pub rebalanced: bool,
}

impl TaskMoved {
    /// Whether the task changed lane (and therefore status)
    pub fn changed_status(&self) -> bool {
        self.from != self.to
    }
}
