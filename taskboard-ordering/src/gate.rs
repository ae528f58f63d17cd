//! Status Transition Gate
//!
//! Consulted before every move. The default policy is fully connected: a
//! task may be dragged from any lane to any lane, including its own, and
//! `COMPLETED` is not terminal.

use crate::error::Result;
use crate::types::Lane;
use std::collections::HashSet;
use std::fmt::Debug;
use taskboard_config::TransitionConfig;

/// Decides whether a task may move from one lane to another
pub trait TransitionPolicy: Debug + Send + Sync {
    fn permitted(&self, from: Lane, to: Lane) -> bool;
}

/// Every transition is allowed
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissive;

impl TransitionPolicy for Permissive {
    fn permitted(&self, _from: Lane, _to: Lane) -> bool {
        true
    }
}

/// Fully connected graph minus an explicit deny list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionMatrix {
    denied: HashSet<(Lane, Lane)>,
}

impl TransitionMatrix {
    /// A matrix that denies nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbid `from -> to`
    pub fn deny(mut self, from: Lane, to: Lane) -> Self {
        self.denied.insert((from, to));
        self
    }

    /// Build the matrix from `transitions.denied` in the board configuration
    pub fn from_config(config: &TransitionConfig) -> Result<Self> {
        let mut matrix = Self::new();
        for rule in &config.denied {
            matrix = matrix.deny(rule.from.parse()?, rule.to.parse()?);
        }
        Ok(matrix)
    }

    /// Number of denied transitions
    pub fn denied_count(&self) -> usize {
        self.denied.len()
    }
}

impl TransitionPolicy for TransitionMatrix {
    fn permitted(&self, from: Lane, to: Lane) -> bool {
        !self.denied.contains(&(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_config::TransitionRule;

    #[test]
    fn test_permissive_is_fully_connected() {
        for from in Lane::ALL {
            for to in Lane::ALL {
                assert!(Permissive.permitted(from, to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_completed_is_not_terminal_by_default() {
        let matrix = TransitionMatrix::new();
        assert!(matrix.permitted(Lane::Completed, Lane::Todo));
        assert!(matrix.permitted(Lane::Completed, Lane::Completed));
    }

    #[test]
    fn test_deny_is_directional() {
        let matrix = TransitionMatrix::new().deny(Lane::Backlog, Lane::Completed);
        assert!(!matrix.permitted(Lane::Backlog, Lane::Completed));
        assert!(matrix.permitted(Lane::Completed, Lane::Backlog));
        assert!(matrix.permitted(Lane::Backlog, Lane::Todo));
    }

    #[test]
    fn test_from_config() {
        let config = TransitionConfig {
            denied: vec![
                TransitionRule::new("backlog", "completed"),
                TransitionRule::new("BLOCKED", "IN_REVIEW"),
            ],
        };
        let matrix = TransitionMatrix::from_config(&config).unwrap();
        assert_eq!(matrix.denied_count(), 2);
        assert!(!matrix.permitted(Lane::Blocked, Lane::InReview));
    }

    #[test]
    fn test_from_config_rejects_unknown_lane() {
        let config = TransitionConfig {
            denied: vec![TransitionRule::new("BACKLOG", "ARCHIVED")],
        };
        assert!(TransitionMatrix::from_config(&config).is_err());
    }
}
