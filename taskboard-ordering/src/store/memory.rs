//! In-process board store

use super::{BoardState, BoardStore, ConditionalWrite};
use crate::error::Result;
use crate::types::{Lane, LaneSnapshot, ProjectId, Task, TaskId};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Board store held entirely in memory.
///
/// Reads take the shared lock and writes the exclusive one, so every
/// operation observes and produces a whole board state.
#[derive(Debug, Default)]
pub struct MemoryBoardStore {
    state: RwLock<BoardState>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state, e.g. one loaded from elsewhere
    pub fn with_state(state: BoardState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the whole state
    pub async fn snapshot(&self) -> BoardState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn get_task(&self, id: &TaskId) -> Result<Task> {
        self.state.read().await.task(id).cloned()
    }

    async fn tasks_in_lane(&self, project: &ProjectId, lane: Lane) -> Result<LaneSnapshot> {
        Ok(self.state.read().await.lane(project, lane))
    }

    async fn lanes(&self, project: &ProjectId) -> Result<Vec<LaneSnapshot>> {
        let state = self.state.read().await;
        Ok(Lane::ALL.iter().map(|lane| state.lane(project, *lane)).collect())
    }

    async fn write_if_version_matches(&self, write: &ConditionalWrite) -> Result<Task> {
        self.state.write().await.apply_write(write)
    }

    async fn renumber_lane(
        &self,
        project: &ProjectId,
        lane: Lane,
        expected_lane_version: u64,
        assignment: &[(TaskId, f64)],
    ) -> Result<LaneSnapshot> {
        self.state
            .write()
            .await
            .apply_renumber(project, lane, expected_lane_version, assignment)
    }

    async fn insert_task(&self, task: Task, expected_lane_version: u64) -> Result<Task> {
        self.state.write().await.insert(task, expected_lane_version)
    }

    async fn remove_task(&self, id: &TaskId, expected_version: u64) -> Result<Task> {
        self.state.write().await.remove(id, expected_version)
    }
}
