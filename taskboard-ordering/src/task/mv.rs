//! MoveTask command: the Reorder Coordinator
//!
//! One move is a short read-compute-conditional-write sequence:
//!
//! 1. received: the task is loaded and its known version checked, then the
//!    destination index is validated against the destination lane. A stale
//!    version is reported as a conflict even when the index is also bad.
//! 2. gate checked: the transition policy must permit `from -> to`
//! 3. neighbors read: the keys around the destination index, with the
//!    moving task itself left out
//! 4. key allocated: midpoint/edge key, renumbering the lane once if the
//!    gap is exhausted
//! 5. committed: conditional write guarded by the task's version and the
//!    destination lane's version
//!
//! Any failure leaves the stored task exactly as it was.

use super::allocate_slot;
use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::store::ConditionalWrite;
use crate::types::{ActorId, Lane, Task, TaskId, TaskMoved};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Move a task to an index within a lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTask {
    /// The task ID to move
    pub id: TaskId,
    /// Destination lane; also the task's new status
    pub lane: Lane,
    /// 0-based index the task will occupy in the destination lane
    pub index: usize,
    /// The task version the caller last saw
    pub known_version: u64,
    /// Who is moving the task, for the outbound event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl MoveTask {
    pub fn new(id: impl Into<TaskId>, lane: Lane, index: usize, known_version: u64) -> Self {
        Self {
            id: id.into(),
            lane,
            index,
            known_version,
            actor: None,
        }
    }

    /// Attribute the move to an actor
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Result of a successful move
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovedTask {
    /// The task as stored after the move
    pub task: Task,
    pub from: Lane,
    pub to: Lane,
    pub index: usize,
    /// The destination lane was renumbered to make room
    pub rebalanced: bool,
    /// The task was already at the requested index; nothing was written
    pub noop: bool,
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveTask {
    type Output = MovedTask;

    async fn execute(&self, ctx: &BoardContext) -> Result<MovedTask> {
        let store = ctx.store();

        let task = store.get_task(&self.id).await?;
        if task.version != self.known_version {
            return Err(BoardError::VersionMismatch {
                id: task.id,
                expected: self.known_version,
                actual: task.version,
            });
        }
        let from = task.status;

        let snapshot = store.tasks_in_lane(&task.project, self.lane).await?;
        let len = snapshot.len_excluding(&task.id);
        if self.index > len {
            return Err(BoardError::IndexOutOfRange {
                index: self.index,
                len,
            });
        }

        if !ctx.gate().permitted(from, self.lane) {
            warn!(task = %task.id, %from, to = %self.lane, "transition denied");
            return Err(BoardError::TransitionDenied {
                from,
                to: self.lane,
            });
        }

        if snapshot.index_of(&task.id) == Some(self.index) {
            debug!(task = %task.id, lane = %self.lane, index = self.index, "task already in place");
            return Ok(MovedTask {
                task,
                from,
                to: self.lane,
                index: self.index,
                rebalanced: false,
                noop: true,
            });
        }

        let slot = allocate_slot(ctx, snapshot, self.index, &task.id).await?;
        debug!(
            task = %task.id,
            lane = %self.lane,
            index = self.index,
            position = slot.position,
            lane_version = slot.snapshot.version,
            "allocated position"
        );

        let write = ConditionalWrite {
            task_id: task.id.clone(),
            expected_version: self.known_version,
            expected_lane_version: slot.snapshot.version,
            status: self.lane,
            position: slot.position,
        };
        let moved = match store.write_if_version_matches(&write).await {
            Ok(moved) => moved,
            Err(e) if slot.rebalanced && e.is_conflict() => {
                warn!(task = %task.id, error = %e, "commit after renumbering conflicted");
                return Err(BoardError::transient(format!(
                    "move conflicted after renumbering: {e}"
                )));
            }
            Err(e) => {
                if e.is_conflict() {
                    warn!(task = %task.id, error = %e, "move conflicted");
                }
                return Err(e);
            }
        };

        info!(
            task = %moved.id,
            %from,
            to = %moved.status,
            index = self.index,
            position = moved.position,
            version = moved.version,
            rebalanced = slot.rebalanced,
            "task moved"
        );

        let event = TaskMoved {
            task_id: moved.id.clone(),
            project: moved.project.clone(),
            from,
            to: moved.status,
            index: self.index,
            position: moved.position,
            version: moved.version,
            actor: self.actor.clone(),
            timestamp: Utc::now(),
            rebalanced: slot.rebalanced,
        };
        if let Err(e) = ctx.events().task_moved(&event).await {
            warn!(task = %moved.id, error = %e, "failed to deliver task moved event");
        }

        Ok(MovedTask {
            task: moved,
            from,
            to: self.lane,
            index: self.index,
            rebalanced: slot.rebalanced,
            noop: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelSink;
    use crate::gate::TransitionMatrix;
    use crate::store::{BoardStore, MemoryBoardStore};
    use crate::task::AddTask;
    use crate::types::{PositionAllocator, ProjectId};

    fn setup() -> BoardContext {
        BoardContext::new(MemoryBoardStore::new())
    }

    async fn add(ctx: &BoardContext, id: &str, lane: Lane) -> Task {
        AddTask::new("p", id, lane)
            .with_id(id)
            .execute(ctx)
            .await
            .unwrap()
    }

    async fn lane_ids(ctx: &BoardContext, lane: Lane) -> Vec<String> {
        ctx.store()
            .tasks_in_lane(&ProjectId::from("p"), lane)
            .await
            .unwrap()
            .tasks
            .into_iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_move_between_lanes_sets_status() {
        let ctx = setup();
        let task = add(&ctx, "a", Lane::Todo).await;

        let moved = MoveTask::new("a", Lane::InProgress, 0, task.version)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(moved.task.status, Lane::InProgress);
        assert_eq!(moved.from, Lane::Todo);
        assert_eq!(moved.task.version, task.version + 1);
        assert!(!moved.noop);
        assert!(lane_ids(&ctx, Lane::Todo).await.is_empty());
    }

    #[tokio::test]
    async fn test_reorder_within_lane() {
        let ctx = setup();
        add(&ctx, "a", Lane::Todo).await;
        add(&ctx, "b", Lane::Todo).await;
        let c = add(&ctx, "c", Lane::Todo).await;

        MoveTask::new("c", Lane::Todo, 0, c.version)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(lane_ids(&ctx, Lane::Todo).await, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_move_to_current_index_is_noop() {
        let ctx = setup();
        add(&ctx, "a", Lane::Todo).await;
        let b = add(&ctx, "b", Lane::Todo).await;

        let moved = MoveTask::new("b", Lane::Todo, 1, b.version)
            .execute(&ctx)
            .await
            .unwrap();

        assert!(moved.noop);
        assert_eq!(moved.task, b);
    }

    #[tokio::test]
    async fn test_index_out_of_range() {
        let ctx = setup();
        add(&ctx, "a", Lane::Todo).await;
        let b = add(&ctx, "b", Lane::Backlog).await;

        // One task in the destination lane: valid indices are 0 and 1
        let err = MoveTask::new("b", Lane::Todo, 2, b.version)
            .execute(&ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::IndexOutOfRange { index: 2, len: 1 }));

        // Within its own lane the task does not count towards the length
        let err = MoveTask::new("b", Lane::Backlog, 1, b.version)
            .execute(&ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::IndexOutOfRange { index: 1, len: 0 }));
    }

    #[tokio::test]
    async fn test_stale_version_conflicts() {
        let ctx = setup();
        let a = add(&ctx, "a", Lane::Todo).await;

        let err = MoveTask::new("a", Lane::Blocked, 0, a.version + 3)
            .execute(&ctx)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(ctx.store().get_task(&a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn test_stale_version_reported_before_bad_index() {
        let ctx = setup();
        let a = add(&ctx, "a", Lane::Todo).await;

        let err = MoveTask::new("a", Lane::Blocked, 7, a.version + 1)
            .execute(&ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::VersionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_gate_denial_leaves_task_untouched() {
        let ctx = setup().with_gate(TransitionMatrix::new().deny(Lane::Backlog, Lane::Completed));
        let a = add(&ctx, "a", Lane::Backlog).await;

        let err = MoveTask::new("a", Lane::Completed, 0, a.version)
            .execute(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BoardError::TransitionDenied {
                from: Lane::Backlog,
                to: Lane::Completed
            }
        ));
        assert_eq!(ctx.store().get_task(&a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let ctx = setup();
        let err = MoveTask::new("ghost", Lane::Todo, 0, 1)
            .execute(&ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::TaskNotFound { .. }));
    }

    #[tokio::test]
    async fn test_event_emitted_with_actor() {
        let sink = ChannelSink::new(4);
        let mut rx = sink.subscribe();
        let ctx = setup().with_events(sink);
        let a = add(&ctx, "a", Lane::Todo).await;

        MoveTask::new("a", Lane::InReview, 0, a.version)
            .with_actor("alex")
            .execute(&ctx)
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.from, Lane::Todo);
        assert_eq!(event.to, Lane::InReview);
        assert_eq!(event.actor, Some(ActorId::from("alex")));
        assert_eq!(event.position, 1000.0);
    }

    #[tokio::test]
    async fn test_second_exhaustion_is_transient_failure() {
        // A minimum gap wider than the renumbering step can never be satisfied
        let ctx = setup().with_allocator(PositionAllocator::new(1000.0, 1000.0, 1500.0));
        add(&ctx, "a", Lane::Todo).await;
        add(&ctx, "b", Lane::Todo).await;
        let d = add(&ctx, "d", Lane::Backlog).await;

        let err = MoveTask::new("d", Lane::Todo, 1, d.version)
            .execute(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, BoardError::TransientFailure { .. }));
        assert_eq!(ctx.store().get_task(&d.id).await.unwrap(), d);
        assert_eq!(lane_ids(&ctx, Lane::Todo).await, vec!["a", "b"]);
    }
}
