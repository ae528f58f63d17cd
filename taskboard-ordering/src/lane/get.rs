//! GetLane command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::{Lane, LaneSnapshot, ProjectId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read one lane in display order. Used for rendering and to refresh
/// before resubmitting a move that conflicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetLane {
    pub project: ProjectId,
    pub lane: Lane,
}

impl GetLane {
    pub fn new(project: impl Into<ProjectId>, lane: Lane) -> Self {
        Self {
            project: project.into(),
            lane,
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for GetLane {
    type Output = LaneSnapshot;

    async fn execute(&self, ctx: &BoardContext) -> Result<LaneSnapshot> {
        ctx.store().tasks_in_lane(&self.project, self.lane).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBoardStore;
    use crate::task::AddTask;

    #[tokio::test]
    async fn test_get_lane() {
        let ctx = BoardContext::new(MemoryBoardStore::new());
        AddTask::new("p", "A", Lane::InProgress)
            .execute(&ctx)
            .await
            .unwrap();
        AddTask::new("p", "Other lane", Lane::Todo)
            .execute(&ctx)
            .await
            .unwrap();

        let lane = GetLane::new("p", Lane::InProgress)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(lane.len(), 1);
        assert_eq!(lane.tasks[0].title, "A");
        assert_eq!(lane.version, 1);
    }
}
