//! Task commands

mod add;
mod mv;
mod remove;

pub use add::AddTask;
pub use mv::{MoveTask, MovedTask};
pub use remove::RemoveTask;

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::{Allocation, LaneSnapshot, TaskId};
use tracing::warn;

/// A key that fits at `index`, plus the snapshot it was computed against
struct Slot {
    snapshot: LaneSnapshot,
    position: f64,
    rebalanced: bool,
}

/// Allocate a key for `index` in `snapshot` (with `excluding` taken out).
///
/// On precision exhaustion the lane is renumbered once and allocation is
/// retried against the renumbered lane; a second exhaustion, or a lane that
/// changed before the renumber could run, is a transient failure.
async fn allocate_slot(
    ctx: &BoardContext,
    snapshot: LaneSnapshot,
    index: usize,
    excluding: &TaskId,
) -> Result<Slot> {
    let allocator = ctx.allocator();

    let (left, right) = snapshot.neighbors(index, excluding);
    if let Allocation::Key(position) = allocator.allocate(left, right)? {
        return Ok(Slot {
            snapshot,
            position,
            rebalanced: false,
        });
    }

    warn!(
        project = %snapshot.project,
        lane = %snapshot.lane,
        ?left,
        ?right,
        "position gap exhausted, renumbering lane"
    );
    let snapshot = ctx
        .rebalancer()
        .renumber_snapshot(&snapshot)
        .await
        .map_err(|e| {
            if e.is_conflict() {
                BoardError::transient(format!("lane changed while renumbering: {e}"))
            } else {
                e
            }
        })?;

    let (left, right) = snapshot.neighbors(index, excluding);
    match allocator.allocate(left, right)? {
        Allocation::Key(position) => Ok(Slot {
            snapshot,
            position,
            rebalanced: true,
        }),
        Allocation::NeedsRebalance => Err(BoardError::transient(format!(
            "no usable gap in {}/{} after renumbering",
            snapshot.project, snapshot.lane
        ))),
    }
}
