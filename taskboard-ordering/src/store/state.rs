//! In-memory board table shared by the store implementations

use super::ConditionalWrite;
use crate::error::{BoardError, Result};
use crate::types::{Lane, LaneSnapshot, ProjectId, Task, TaskId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// All tasks of a board plus the per-lane counters.
///
/// Mutating methods validate everything before changing anything, so a
/// failed call leaves the state untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    #[serde(default)]
    tasks: BTreeMap<TaskId, Task>,
    /// Keyed by `project:LANE`
    #[serde(default)]
    lane_versions: BTreeMap<String, u64>,
}

fn lane_key(project: &ProjectId, lane: Lane) -> String {
    format!("{project}:{lane}")
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks across all projects
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, id: &TaskId) -> Result<&Task> {
        self.tasks.get(id).ok_or_else(|| BoardError::task_not_found(id))
    }

    pub fn lane_version(&self, project: &ProjectId, lane: Lane) -> u64 {
        self.lane_versions
            .get(&lane_key(project, lane))
            .copied()
            .unwrap_or(0)
    }

    /// Snapshot of one lane, ascending by position
    pub fn lane(&self, project: &ProjectId, lane: Lane) -> LaneSnapshot {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|t| &t.project == project && t.status == lane)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.position.total_cmp(&b.position).then_with(|| a.id.cmp(&b.id)));

        LaneSnapshot {
            project: project.clone(),
            lane,
            version: self.lane_version(project, lane),
            tasks,
        }
    }

    fn bump_lane(&mut self, project: &ProjectId, lane: Lane) {
        *self
            .lane_versions
            .entry(lane_key(project, lane))
            .or_insert(0) += 1;
    }

    fn check_lane_version(&self, project: &ProjectId, lane: Lane, expected: u64) -> Result<()> {
        let actual = self.lane_version(project, lane);
        if actual != expected {
            return Err(BoardError::LaneVersionMismatch {
                project: project.clone(),
                lane,
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn check_free_slot(
        &self,
        project: &ProjectId,
        lane: Lane,
        position: f64,
        ignoring: &TaskId,
    ) -> Result<()> {
        if !position.is_finite() {
            return Err(BoardError::invalid_value(
                "position",
                format!("{position} is not a finite number"),
            ));
        }
        let taken = self.tasks.values().any(|t| {
            &t.id != ignoring && &t.project == project && t.status == lane && t.position == position
        });
        if taken {
            return Err(BoardError::invalid_value(
                "position",
                format!("{position} is already used in {project}/{lane}"),
            ));
        }
        Ok(())
    }

    /// Add a new task. Its row version starts at 1.
    pub fn insert(&mut self, mut task: Task, expected_lane_version: u64) -> Result<Task> {
        if self.tasks.contains_key(&task.id) {
            return Err(BoardError::invalid_value(
                "id",
                format!("task {} already exists", task.id),
            ));
        }
        self.check_lane_version(&task.project, task.status, expected_lane_version)?;
        self.check_free_slot(&task.project, task.status, task.position, &task.id)?;

        task.version = 1;
        task.updated_at = Utc::now();
        self.bump_lane(&task.project, task.status);
        self.tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    /// Delete a task
    pub fn remove(&mut self, id: &TaskId, expected_version: u64) -> Result<Task> {
        let task = self.task(id)?;
        if task.version != expected_version {
            return Err(BoardError::VersionMismatch {
                id: id.clone(),
                expected: expected_version,
                actual: task.version,
            });
        }
        let (project, lane) = (task.project.clone(), task.status);
        self.bump_lane(&project, lane);
        self.tasks.remove(id).ok_or_else(|| BoardError::task_not_found(id))
    }

    /// Apply a conditional move
    pub fn apply_write(&mut self, write: &ConditionalWrite) -> Result<Task> {
        let current = self.task(&write.task_id)?;
        if current.version != write.expected_version {
            return Err(BoardError::VersionMismatch {
                id: write.task_id.clone(),
                expected: write.expected_version,
                actual: current.version,
            });
        }
        let project = current.project.clone();
        let from = current.status;

        self.check_lane_version(&project, write.status, write.expected_lane_version)?;
        self.check_free_slot(&project, write.status, write.position, &write.task_id)?;

        if from != write.status {
            self.bump_lane(&project, from);
        }
        self.bump_lane(&project, write.status);

        let task = self
            .tasks
            .get_mut(&write.task_id)
            .ok_or_else(|| BoardError::task_not_found(&write.task_id))?;
        task.status = write.status;
        task.position = write.position;
        task.version += 1;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    /// Relabel every task of a lane. Row versions are left alone: the
    /// relative order, which is all a position means, does not change.
    pub fn apply_renumber(
        &mut self,
        project: &ProjectId,
        lane: Lane,
        expected_lane_version: u64,
        assignment: &[(TaskId, f64)],
    ) -> Result<LaneSnapshot> {
        self.check_lane_version(project, lane, expected_lane_version)?;

        let current = self.lane(project, lane).ids();
        let proposed: Vec<&TaskId> = assignment.iter().map(|(id, _)| id).collect();
        if proposed.len() != current.len() || proposed.iter().zip(&current).any(|(a, b)| *a != b) {
            return Err(BoardError::invalid_value(
                "assignment",
                format!("must list the {} members of {project}/{lane} in their current order", current.len()),
            ));
        }

        let mut seen = HashSet::with_capacity(assignment.len());
        let mut previous: Option<f64> = None;
        for (_, position) in assignment {
            let ascending = previous.is_none_or(|p| p < *position);
            if !position.is_finite() || !ascending || !seen.insert(position.to_bits()) {
                return Err(BoardError::invalid_value(
                    "assignment",
                    "positions must be finite and strictly ascending",
                ));
            }
            previous = Some(*position);
        }

        for (id, position) in assignment {
            if let Some(task) = self.tasks.get_mut(id) {
                task.position = *position;
            }
        }
        self.bump_lane(project, lane);
        Ok(self.lane(project, lane))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectId {
        ProjectId::from("p")
    }

    fn seeded(lane: Lane, items: &[(&str, f64)]) -> BoardState {
        let mut state = BoardState::new();
        for (id, pos) in items {
            let version = state.lane_version(&project(), lane);
            state
                .insert(
                    Task::new("p", *id, lane).with_id(*id).with_position(*pos),
                    version,
                )
                .unwrap();
        }
        state
    }

    fn write(id: &str, version: u64, lane_version: u64, status: Lane, position: f64) -> ConditionalWrite {
        ConditionalWrite {
            task_id: TaskId::from(id),
            expected_version: version,
            expected_lane_version: lane_version,
            status,
            position,
        }
    }

    #[test]
    fn test_lane_is_sorted_and_versioned() {
        let state = seeded(Lane::Todo, &[("c", 3000.0), ("a", 1000.0), ("b", 2000.0)]);
        let lane = state.lane(&project(), Lane::Todo);

        assert_eq!(lane.positions(), vec![1000.0, 2000.0, 3000.0]);
        assert_eq!(lane.version, 3);
        assert!(state.lane(&project(), Lane::Completed).is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicate_position_and_id() {
        let mut state = seeded(Lane::Todo, &[("a", 1000.0)]);
        let v = state.lane_version(&project(), Lane::Todo);

        let dup_pos = Task::new("p", "x", Lane::Todo).with_id("x").with_position(1000.0);
        assert!(state.insert(dup_pos, v).is_err());

        let dup_id = Task::new("p", "a", Lane::Todo).with_id("a").with_position(5.0);
        assert!(state.insert(dup_id, v).is_err());
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_write_between_lanes_bumps_both_counters() {
        let mut state = seeded(Lane::Todo, &[("a", 1000.0)]);
        let todo_before = state.lane_version(&project(), Lane::Todo);

        let moved = state
            .apply_write(&write("a", 1, 0, Lane::Completed, 1000.0))
            .unwrap();

        assert_eq!(moved.status, Lane::Completed);
        assert_eq!(moved.version, 2);
        assert_eq!(state.lane_version(&project(), Lane::Todo), todo_before + 1);
        assert_eq!(state.lane_version(&project(), Lane::Completed), 1);
    }

    #[test]
    fn test_write_with_stale_row_version_fails() {
        let mut state = seeded(Lane::Todo, &[("a", 1000.0)]);
        let before = state.clone();

        let err = state
            .apply_write(&write("a", 7, 0, Lane::Completed, 1000.0))
            .unwrap_err();

        assert!(matches!(err, BoardError::VersionMismatch { expected: 7, actual: 1, .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_second_write_on_same_lane_read_conflicts() {
        let mut state = seeded(Lane::Todo, &[("d", 1000.0), ("e", 2000.0)]);
        let lane_version = state.lane_version(&project(), Lane::Completed);

        state
            .apply_write(&write("d", 1, lane_version, Lane::Completed, 1000.0))
            .unwrap();
        let err = state
            .apply_write(&write("e", 1, lane_version, Lane::Completed, 1000.0))
            .unwrap_err();

        assert!(matches!(err, BoardError::LaneVersionMismatch { .. }));
    }

    #[test]
    fn test_renumber_relabels_without_touching_row_versions() {
        let mut state = seeded(Lane::Todo, &[("a", 1.0), ("b", 1.5), ("c", 1.75)]);
        let v = state.lane_version(&project(), Lane::Todo);
        let assignment = vec![
            (TaskId::from("a"), 0.0),
            (TaskId::from("b"), 1000.0),
            (TaskId::from("c"), 2000.0),
        ];

        let lane = state
            .apply_renumber(&project(), Lane::Todo, v, &assignment)
            .unwrap();

        assert_eq!(lane.positions(), vec![0.0, 1000.0, 2000.0]);
        assert_eq!(lane.version, v + 1);
        assert!(lane.tasks.iter().all(|t| t.version == 1));
    }

    #[test]
    fn test_renumber_refuses_reorder_and_partial_assignment() {
        let mut state = seeded(Lane::Todo, &[("a", 1.0), ("b", 2.0)]);
        let v = state.lane_version(&project(), Lane::Todo);

        let swapped = vec![(TaskId::from("b"), 0.0), (TaskId::from("a"), 1000.0)];
        assert!(state.apply_renumber(&project(), Lane::Todo, v, &swapped).is_err());

        let partial = vec![(TaskId::from("a"), 0.0)];
        assert!(state.apply_renumber(&project(), Lane::Todo, v, &partial).is_err());

        let stale = vec![(TaskId::from("a"), 0.0), (TaskId::from("b"), 1000.0)];
        assert!(matches!(
            state.apply_renumber(&project(), Lane::Todo, v - 1, &stale),
            Err(BoardError::LaneVersionMismatch { .. })
        ));

        assert_eq!(state.lane(&project(), Lane::Todo).positions(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_remove_checks_row_version() {
        let mut state = seeded(Lane::Todo, &[("a", 1.0)]);
        assert!(state.remove(&TaskId::from("a"), 9).is_err());
        state.remove(&TaskId::from("a"), 1).unwrap();
        assert!(state.is_empty());
        assert_eq!(state.lane_version(&project(), Lane::Todo), 2);
    }

    #[test]
    fn test_state_survives_json() {
        let state = seeded(Lane::InReview, &[("a", 1.0), ("b", 2.0)]);
        let json = serde_json::to_string(&state).unwrap();
        let restored: BoardState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
