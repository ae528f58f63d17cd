//! Core types for the ordering engine

mod event;
mod ids;
mod lane;
mod position;
mod snapshot;
mod task;

pub use event::TaskMoved;
pub use ids::{ActorId, ProjectId, TaskId};
pub use lane::Lane;
pub use position::{Allocation, PositionAllocator};
pub use snapshot::LaneSnapshot;
pub use task::Task;
