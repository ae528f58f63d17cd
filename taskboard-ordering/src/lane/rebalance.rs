//! RebalanceLane command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::{Lane, LaneSnapshot, ProjectId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Renumber a lane to `0, B, 2B, ...` without changing its order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceLane {
    pub project: ProjectId,
    pub lane: Lane,
}

impl RebalanceLane {
    pub fn new(project: impl Into<ProjectId>, lane: Lane) -> Self {
        Self {
            project: project.into(),
            lane,
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for RebalanceLane {
    type Output = LaneSnapshot;

    async fn execute(&self, ctx: &BoardContext) -> Result<LaneSnapshot> {
        ctx.rebalancer().renumber(&self.project, self.lane).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBoardStore;
    use crate::task::AddTask;

    #[tokio::test]
    async fn test_rebalance_lane() {
        let ctx = BoardContext::new(MemoryBoardStore::new());
        for title in ["A", "B", "C"] {
            AddTask::new("p", title, Lane::Todo)
                .at_index(0)
                .execute(&ctx)
                .await
                .unwrap();
        }

        let lane = RebalanceLane::new("p", Lane::Todo)
            .execute(&ctx)
            .await
            .unwrap();

        let titles: Vec<&str> = lane.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
        assert_eq!(lane.positions(), vec![0.0, 1000.0, 2000.0]);
    }
}
