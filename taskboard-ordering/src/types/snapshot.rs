//! Consistent read of one lane

use super::ids::{ProjectId, TaskId};
use super::lane::Lane;
use super::task::Task;
use serde::{Deserialize, Serialize};

/// The tasks of one (project, lane) pair, ascending by position, together
/// with the lane's version counter at the moment of the read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub project: ProjectId,
    pub lane: Lane,
    pub version: u64,
    pub tasks: Vec<Task>,
}

impl LaneSnapshot {
    /// Number of tasks in the lane
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Index of a task within the lane
    pub fn index_of(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Whether the task is a member of this lane
    pub fn contains(&self, id: &TaskId) -> bool {
        self.index_of(id).is_some()
    }

    /// Lane length once `excluding` is taken out (if it is a member)
    pub fn len_excluding(&self, excluding: &TaskId) -> usize {
        self.len() - usize::from(self.contains(excluding))
    }

    /// Positions in lane order
    pub fn positions(&self) -> Vec<f64> {
        self.tasks.iter().map(|t| t.position).collect()
    }

    /// Task ids in lane order
    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }

    /// Neighbor keys around `index` in the lane with `excluding` removed.
    ///
    /// `index` is the slot the task will occupy afterwards, so `0` yields
    /// `(None, first)` and `len_excluding` yields `(last, None)`.
    pub fn neighbors(&self, index: usize, excluding: &TaskId) -> (Option<f64>, Option<f64>) {
        let others: Vec<f64> = self
            .tasks
            .iter()
            .filter(|t| &t.id != excluding)
            .map(|t| t.position)
            .collect();

        let left = index.checked_sub(1).and_then(|i| others.get(i)).copied();
        let right = others.get(index).copied();
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane(positions: &[(&str, f64)]) -> LaneSnapshot {
        LaneSnapshot {
            project: ProjectId::from("p"),
            lane: Lane::Todo,
            version: 1,
            tasks: positions
                .iter()
                .map(|(id, pos)| Task::new("p", *id, Lane::Todo).with_id(*id).with_position(*pos))
                .collect(),
        }
    }

    #[test]
    fn test_neighbors_at_edges() {
        let snapshot = lane(&[("a", 1000.0), ("b", 2000.0)]);
        let outsider = TaskId::from("z");

        assert_eq!(snapshot.neighbors(0, &outsider), (None, Some(1000.0)));
        assert_eq!(snapshot.neighbors(1, &outsider), (Some(1000.0), Some(2000.0)));
        assert_eq!(snapshot.neighbors(2, &outsider), (Some(2000.0), None));
    }

    #[test]
    fn test_neighbors_skip_moving_task() {
        let snapshot = lane(&[("a", 1000.0), ("b", 2000.0), ("c", 3000.0)]);
        let b = TaskId::from("b");

        assert_eq!(snapshot.len_excluding(&b), 2);
        assert_eq!(snapshot.neighbors(1, &b), (Some(1000.0), Some(3000.0)));
        assert_eq!(snapshot.neighbors(2, &b), (Some(3000.0), None));
    }

    #[test]
    fn test_empty_lane() {
        let snapshot = lane(&[]);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.neighbors(0, &TaskId::from("x")), (None, None));
    }
}
