//! Ordered task board engine
//!
//! Keeps each status lane of a project's board in a stable, user-controlled
//! order and moves tasks between lanes and positions, correctly under
//! concurrent edits.
//!
//! ## Overview
//!
//! - **Position keys** - every task carries an `f64` key; a lane is its
//!   tasks sorted ascending by key. New keys are midpoints or fixed steps
//!   past the lane ends ([`PositionAllocator`]).
//! - **Conditional writes** - a move commits only if neither the task nor
//!   its destination lane changed since they were read. Two moves racing
//!   for the same gap: one wins, the other gets a conflict and must refresh.
//! - **Rebalancing** - when a gap runs out of floating-point precision the
//!   lane is renumbered `0, B, 2B, ...` in one atomic, lane-versioned write
//!   and the allocation is retried once.
//! - **Transition gate** - a pluggable [`TransitionPolicy`] is consulted
//!   before every move; the default lets a task go anywhere.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use taskboard_ordering::{
//!     task::{AddTask, MoveTask}, lane::GetLane, BoardContext, Execute, Lane, MemoryBoardStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = BoardContext::new(MemoryBoardStore::new());
//!
//! let task = AddTask::new("apollo", "Write launch checklist", Lane::Todo)
//!     .execute(&ctx)
//!     .await?;
//!
//! let moved = MoveTask::new(task.id.clone(), Lane::InProgress, 0, task.version)
//!     .with_actor("alex")
//!     .execute(&ctx)
//!     .await?;
//! assert_eq!(moved.task.status, Lane::InProgress);
//!
//! let lane = GetLane::new("apollo", Lane::InProgress).execute(&ctx).await?;
//! println!("{} task(s) in progress", lane.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every failure leaves the stored task exactly as it was. Use
//! [`BoardError::kind`] to branch and [`BoardError::is_retryable`] to decide
//! whether to refresh the lane and resubmit.

mod context;
mod error;
pub mod events;
pub mod gate;
mod operation;
pub mod rebalance;
pub mod store;
pub mod types;

// Command modules
pub mod board;
pub mod lane;
pub mod task;

pub use context::BoardContext;
pub use error::{BoardError, ErrorKind, Result};
pub use events::{ActivityLog, ChannelSink, MoveEventSink, NullSink};
pub use gate::{Permissive, TransitionMatrix, TransitionPolicy};
pub use operation::Execute;
pub use rebalance::Rebalancer;
pub use store::{BoardState, BoardStore, ConditionalWrite, FileBoardStore, MemoryBoardStore};

// Re-export commonly used types
pub use types::{
    ActorId, Allocation, Lane, LaneSnapshot, PositionAllocator, ProjectId, Task, TaskId, TaskMoved,
};
