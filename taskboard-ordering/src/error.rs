//! Error types for the ordering engine

use crate::types::{Lane, ProjectId, TaskId};
use taskboard_config::ConfigError;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Destination index outside `[0, len]`
    #[error("destination index {index} out of range for lane of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Allocator called with neighbors out of order
    #[error("neighbor keys out of order: left {left} must be below right {right}")]
    InvalidNeighbors { left: f64, right: f64 },

    /// The status transition gate refused the move
    #[error("transition from {from} to {to} is not permitted")]
    TransitionDenied { from: Lane, to: Lane },

    /// The task changed since the caller read it
    #[error("task {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionMismatch {
        id: TaskId,
        expected: u64,
        actual: u64,
    },

    /// The lane changed since the caller read it
    #[error("lane {project}/{lane} was modified concurrently (expected version {expected}, found {actual})")]
    LaneVersionMismatch {
        project: ProjectId,
        lane: Lane,
        expected: u64,
        actual: u64,
    },

    /// Rebalancing could not produce a usable gap, or the retry after it conflicted
    #[error("transient failure: {message}")]
    TransientFailure { message: String },

    /// Lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// Lock timeout
    #[error("lock timeout after {elapsed_ms}ms")]
    LockTimeout { elapsed_ms: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be turned into a board policy
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    TransitionDenied,
    Conflict,
    TransientFailure,
    Persistence,
}

impl BoardError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a transient failure
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientFailure {
            message: message.into(),
        }
    }

    /// Create a task-not-found error
    pub fn task_not_found(id: &TaskId) -> Self {
        Self::TaskNotFound { id: id.to_string() }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IndexOutOfRange { .. }
            | Self::TaskNotFound { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidNeighbors { .. }
            | Self::Config(_) => ErrorKind::Validation,
            Self::TransitionDenied { .. } => ErrorKind::TransitionDenied,
            Self::VersionMismatch { .. } | Self::LaneVersionMismatch { .. } => ErrorKind::Conflict,
            Self::TransientFailure { .. } => ErrorKind::TransientFailure,
            Self::LockBusy | Self::LockTimeout { .. } | Self::Io(_) | Self::Json(_) => {
                ErrorKind::Persistence
            }
        }
    }

    /// True for version mismatches on either the task or the lane
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Whether the caller may resubmit after refreshing its lane snapshot
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Conflict | ErrorKind::TransientFailure
        ) || matches!(self, Self::LockBusy | Self::LockTimeout { .. })
    }
}
