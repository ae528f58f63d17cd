//! Board State Store: the authoritative table of tasks per (project, lane).
//!
//! Every store keeps two kinds of version counters:
//!
//! - a row `version` on each task, bumped whenever its status or position
//!   changes through a move;
//! - a lane counter per (project, lane), bumped by every mutation that
//!   touches the lane (insert, remove, move in or out, renumber).
//!
//! Conditional writes check both, which is what makes two concurrent moves
//! into the same gap conflict instead of producing duplicate keys.

mod file;
mod memory;
mod state;

pub use file::{FileBoardStore, FileBoardLock};
pub use memory::MemoryBoardStore;
pub use state::BoardState;

use crate::error::Result;
use crate::types::{Lane, LaneSnapshot, ProjectId, Task, TaskId};
use async_trait::async_trait;

/// A single-row conditional update of a task's lane and position
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalWrite {
    pub task_id: TaskId,
    /// Row version the caller last saw
    pub expected_version: u64,
    /// Destination lane counter observed when the neighbors were read
    pub expected_lane_version: u64,
    pub status: Lane,
    pub position: f64,
}

/// Storage primitives. No business logic; commands do the work.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Read one task
    async fn get_task(&self, id: &TaskId) -> Result<Task>;

    /// Consistent, position-ordered read of one lane
    async fn tasks_in_lane(&self, project: &ProjectId, lane: Lane) -> Result<LaneSnapshot>;

    /// Every lane of a project, in [`Lane::ALL`] order
    async fn lanes(&self, project: &ProjectId) -> Result<Vec<LaneSnapshot>> {
        let mut lanes = Vec::with_capacity(Lane::ALL.len());
        for lane in Lane::ALL {
            lanes.push(self.tasks_in_lane(project, lane).await?);
        }
        Ok(lanes)
    }

    /// Move a task if neither it nor its destination lane changed since read
    async fn write_if_version_matches(&self, write: &ConditionalWrite) -> Result<Task>;

    /// Atomically relabel every task of a lane, guarded by the lane counter.
    /// `assignment` must list exactly the lane's members in their current order.
    async fn renumber_lane(
        &self,
        project: &ProjectId,
        lane: Lane,
        expected_lane_version: u64,
        assignment: &[(TaskId, f64)],
    ) -> Result<LaneSnapshot>;

    /// Add a new task at its `status`/`position`, guarded by the lane counter
    async fn insert_task(&self, task: Task, expected_lane_version: u64) -> Result<Task>;

    /// Delete a task, guarded by its row version
    async fn remove_task(&self, id: &TaskId, expected_version: u64) -> Result<Task>;
}
