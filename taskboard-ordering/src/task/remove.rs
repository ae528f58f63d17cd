//! RemoveTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::{Task, TaskId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Delete a task on behalf of the task-management surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveTask {
    pub id: TaskId,
    pub known_version: u64,
}

impl RemoveTask {
    pub fn new(id: impl Into<TaskId>, known_version: u64) -> Self {
        Self {
            id: id.into(),
            known_version,
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for RemoveTask {
    type Output = Task;

    async fn execute(&self, ctx: &BoardContext) -> Result<Task> {
        let removed = ctx.store().remove_task(&self.id, self.known_version).await?;
        info!(task = %removed.id, lane = %removed.status, "task removed");
        Ok(removed)
    }
}
