//! Configuration types and their compiled defaults

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base key for the first task of an empty lane
pub const DEFAULT_BASE: f64 = 1000.0;

/// Default distance used for head and tail inserts
pub const DEFAULT_SPACING: f64 = 1000.0;

/// Default smallest gap the allocator will split
pub const DEFAULT_MIN_GAP: f64 = 1e-6;

/// Default storage directory, relative to the working directory
pub const DEFAULT_STORAGE_ROOT: &str = ".taskboard";

/// Top-level configuration for a task board
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub ordering: OrderingConfig,
    pub storage: StorageConfig,
    pub transitions: TransitionConfig,
}

impl BoardConfig {
    /// Check invariants that figment cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        self.ordering.validate()?;
        self.storage.validate()?;
        self.transitions.validate()
    }
}

/// Numeric constants used by the position allocator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    /// Key assigned to the first task of an empty lane; also the renumbering step
    pub base: f64,
    /// Distance used for head and tail inserts
    pub spacing: f64,
    /// Gaps narrower than this trigger a rebalance instead of a midpoint
    pub min_gap: f64,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            spacing: DEFAULT_SPACING,
            min_gap: DEFAULT_MIN_GAP,
        }
    }
}

impl OrderingConfig {
    fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("ordering.base", self.base),
            ("ordering.spacing", self.spacing),
            ("ordering.min_gap", self.min_gap),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::validation(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        // Renumbered keys sit `base` apart
        if self.min_gap >= self.base {
            return Err(ConfigError::validation(format!(
                "ordering.min_gap ({}) must be smaller than ordering.base ({})",
                self.min_gap, self.base
            )));
        }
        if self.min_gap >= self.spacing {
            return Err(ConfigError::validation(format!(
                "ordering.min_gap ({}) must be smaller than ordering.spacing ({})",
                self.min_gap, self.spacing
            )));
        }
        Ok(())
    }
}

/// File-backed store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `board.json` and the lock file
    pub root: PathBuf,
    /// How long a writer waits for the board lock before giving up
    pub lock_timeout_ms: u64,
    /// Pause between lock attempts
    pub lock_retry_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            lock_timeout_ms: 5000,
            lock_retry_ms: 10,
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.lock_retry_ms == 0 {
            return Err(ConfigError::validation(
                "storage.lock_retry_ms must be greater than zero",
            ));
        }
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::validation("storage.root must not be empty"));
        }
        Ok(())
    }
}

/// Status transition policy. An empty deny list means every lane is
/// reachable from every other lane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub denied: Vec<TransitionRule>,
}

impl TransitionConfig {
    fn validate(&self) -> ConfigResult<()> {
        for rule in &self.denied {
            if rule.from.trim().is_empty() || rule.to.trim().is_empty() {
                return Err(ConfigError::validation(
                    "transitions.denied entries need both `from` and `to`",
                ));
            }
        }
        Ok(())
    }
}

/// A single forbidden `from -> to` lane transition, by lane name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: String,
    pub to: String,
}

impl TransitionRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
