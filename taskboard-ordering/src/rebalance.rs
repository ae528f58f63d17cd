//! Rebalancer: renumbers a lane when its keys run out of precision.
//!
//! Renumbering is a pure relabel. The lane keeps its exact order and the
//! keys become `0, B, 2B, ...`. The whole lane is written in one
//! conditional store call guarded by the lane counter, so a move that
//! commits between the read and the write makes the renumber fail instead
//! of being overwritten.

use crate::error::Result;
use crate::store::BoardStore;
use crate::types::{Lane, LaneSnapshot, PositionAllocator, ProjectId, TaskId};
use tracing::info;

pub struct Rebalancer<'a> {
    store: &'a dyn BoardStore,
    allocator: PositionAllocator,
}

impl<'a> Rebalancer<'a> {
    pub fn new(store: &'a dyn BoardStore, allocator: PositionAllocator) -> Self {
        Self { store, allocator }
    }

    /// Renumber the lane as it currently stands
    pub async fn renumber(&self, project: &ProjectId, lane: Lane) -> Result<LaneSnapshot> {
        let snapshot = self.store.tasks_in_lane(project, lane).await?;
        self.renumber_snapshot(&snapshot).await
    }

    /// Renumber exactly the given snapshot. Fails with a lane conflict if
    /// the lane changed since the snapshot was taken.
    pub async fn renumber_snapshot(&self, snapshot: &LaneSnapshot) -> Result<LaneSnapshot> {
        let assignment: Vec<(TaskId, f64)> = snapshot
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| (task.id.clone(), self.allocator.renumbered(i)))
            .collect();

        let renumbered = self
            .store
            .renumber_lane(&snapshot.project, snapshot.lane, snapshot.version, &assignment)
            .await?;

        info!(
            project = %snapshot.project,
            lane = %snapshot.lane,
            tasks = renumbered.len(),
            version = renumbered.version,
            "renumbered lane"
        );
        Ok(renumbered)
    }
}
