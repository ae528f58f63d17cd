//! AddTask command
//!
//! Task creation belongs to the task-management surface; this command is
//! the hook it uses so a new task lands at a key consistent with the lane's
//! ordering.

use super::allocate_slot;
use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::{Lane, ProjectId, Task, TaskId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Add a new task to a lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTask {
    pub project: ProjectId,
    /// The task title (required)
    pub title: String,
    /// Detailed task description
    pub description: Option<String>,
    /// Initial lane/status
    pub lane: Lane,
    /// Index within the lane; appended at the tail when absent
    pub index: Option<usize>,
    /// Caller-chosen id; a ULID is generated when absent
    pub id: Option<TaskId>,
}

impl AddTask {
    /// Create a new AddTask command appending to `lane`
    pub fn new(project: impl Into<ProjectId>, title: impl Into<String>, lane: Lane) -> Self {
        Self {
            project: project.into(),
            title: title.into(),
            description: None,
            lane,
            index: None,
            id: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Insert at `index` instead of the tail
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Use a specific id
    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddTask {
    type Output = Task;

    async fn execute(&self, ctx: &BoardContext) -> Result<Task> {
        let mut task = Task::new(self.project.clone(), self.title.clone(), self.lane);
        if let Some(id) = &self.id {
            task = task.with_id(id.clone());
        }
        if let Some(description) = &self.description {
            task = task.with_description(description.clone());
        }

        let snapshot = ctx.store().tasks_in_lane(&self.project, self.lane).await?;
        let index = self.index.unwrap_or(snapshot.len());
        if index > snapshot.len() {
            return Err(BoardError::IndexOutOfRange {
                index,
                len: snapshot.len(),
            });
        }

        let slot = allocate_slot(ctx, snapshot, index, &task.id).await?;
        task.position = slot.position;

        let task = ctx
            .store()
            .insert_task(task, slot.snapshot.version)
            .await?;
        info!(
            task = %task.id,
            project = %task.project,
            lane = %task.status,
            position = task.position,
            "task added"
        );
        Ok(task)
    }
}
