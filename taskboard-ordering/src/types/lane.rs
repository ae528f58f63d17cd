//! The closed set of status lanes

use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A status value. Every task sits in exactly one lane; the lane of a
/// project is the set of its tasks sharing that status, ordered by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lane {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Blocked,
    Completed,
}

impl Lane {
    /// All lanes in board display order
    pub const ALL: [Lane; 6] = [
        Lane::Backlog,
        Lane::Todo,
        Lane::InProgress,
        Lane::InReview,
        Lane::Blocked,
        Lane::Completed,
    ];

    /// Canonical name, as stored and displayed
    pub fn as_str(self) -> &'static str {
        match self {
            Lane::Backlog => "BACKLOG",
            Lane::Todo => "TODO",
            Lane::InProgress => "IN_PROGRESS",
            Lane::InReview => "IN_REVIEW",
            Lane::Blocked => "BLOCKED",
            Lane::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = BoardError;

    /// Case-insensitive; `-` and spaces are accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Lane::ALL
            .into_iter()
            .find(|lane| lane.as_str() == normalized)
            .ok_or_else(|| BoardError::invalid_value("lane", format!("unknown lane '{s}'")))
    }
}
