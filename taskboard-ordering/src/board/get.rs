//! GetBoard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::{Lane, LaneSnapshot, ProjectId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read every lane of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetBoard {
    pub project: ProjectId,
}

impl GetBoard {
    pub fn new(project: impl Into<ProjectId>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

/// All lanes of a project in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub project: ProjectId,
    pub lanes: Vec<LaneSnapshot>,
}

impl BoardView {
    pub fn lane(&self, lane: Lane) -> Option<&LaneSnapshot> {
        self.lanes.iter().find(|l| l.lane == lane)
    }

    /// Total number of tasks on the board
    pub fn task_count(&self) -> usize {
        self.lanes.iter().map(LaneSnapshot::len).sum()
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for GetBoard {
    type Output = BoardView;

    async fn execute(&self, ctx: &BoardContext) -> Result<BoardView> {
        Ok(BoardView {
            project: self.project.clone(),
            lanes: ctx.store().lanes(&self.project).await?,
        })
    }
}
