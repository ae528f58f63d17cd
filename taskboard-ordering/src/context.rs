//! BoardContext - what every command runs against
//!
//! The context provides access to the store, the transition policy, the
//! allocator constants and the outbound event sink. No business logic
//! methods; commands do all the work.

use crate::error::Result;
use crate::events::{MoveEventSink, NullSink};
use crate::gate::{Permissive, TransitionMatrix, TransitionPolicy};
use crate::rebalance::Rebalancer;
use crate::store::{BoardStore, FileBoardStore};
use crate::types::PositionAllocator;
use std::sync::Arc;
use taskboard_config::{BoardConfig, ConfigProvider};

/// Context passed to every command - provides access, not logic
#[derive(Clone)]
pub struct BoardContext {
    store: Arc<dyn BoardStore>,
    gate: Arc<dyn TransitionPolicy>,
    allocator: PositionAllocator,
    events: Arc<dyn MoveEventSink>,
}

impl BoardContext {
    /// Context over `store` with the permissive gate, default constants and
    /// no event delivery
    pub fn new(store: impl BoardStore + 'static) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    /// Context over a store that is shared with other owners
    pub fn with_shared_store(store: Arc<dyn BoardStore>) -> Self {
        Self {
            store,
            gate: Arc::new(Permissive),
            allocator: PositionAllocator::default(),
            events: Arc::new(NullSink),
        }
    }

    /// File-backed context built entirely from configuration
    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        let gate = TransitionMatrix::from_config(&config.transitions)?;
        tracing::debug!(
            root = %config.storage.root.display(),
            denied = gate.denied_count(),
            "building board context from configuration"
        );
        Ok(Self::new(FileBoardStore::from_config(&config.storage))
            .with_gate(gate)
            .with_allocator(PositionAllocator::from_config(&config.ordering)))
    }

    /// Load configuration through `provider` and build a file-backed context
    pub fn load(provider: &ConfigProvider) -> Result<Self> {
        let config = provider.load()?;
        Self::from_config(&config)
    }

    /// Replace the transition policy
    pub fn with_gate(mut self, gate: impl TransitionPolicy + 'static) -> Self {
        self.gate = Arc::new(gate);
        self
    }

    /// Replace the ordering constants
    pub fn with_allocator(mut self, allocator: PositionAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Deliver move events to `events`
    pub fn with_events(mut self, events: impl MoveEventSink + 'static) -> Self {
        self.events = Arc::new(events);
        self
    }

    pub fn store(&self) -> &dyn BoardStore {
        self.store.as_ref()
    }

    pub fn gate(&self) -> &dyn TransitionPolicy {
        self.gate.as_ref()
    }

    pub fn allocator(&self) -> PositionAllocator {
        self.allocator
    }

    pub fn events(&self) -> &dyn MoveEventSink {
        self.events.as_ref()
    }

    /// Rebalancer over this context's store and constants
    pub fn rebalancer(&self) -> Rebalancer<'_> {
        Rebalancer::new(self.store(), self.allocator)
    }
}

impl std::fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardContext")
            .field("gate", &self.gate)
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::types::Lane;
    use taskboard_config::{ConfigError, TransitionRule};
    use tempfile::TempDir;

    #[test]
    fn test_from_config_applies_policy_and_constants() {
        let temp = TempDir::new().unwrap();
        let mut config = BoardConfig::default();
        config.storage.root = temp.path().join("board");
        config.ordering.spacing = 64.0;
        config
            .transitions
            .denied
            .push(TransitionRule::new("BACKLOG", "COMPLETED"));

        let ctx = BoardContext::from_config(&config).unwrap();

        assert_eq!(ctx.allocator().spacing(), 64.0);
        assert!(!ctx.gate().permitted(Lane::Backlog, Lane::Completed));
        assert!(ctx.gate().permitted(Lane::Todo, Lane::Completed));
    }

    #[test]
    fn test_from_config_rejects_unknown_lane() {
        let mut config = BoardConfig::default();
        config
            .transitions
            .denied
            .push(TransitionRule::new("NOWHERE", "TODO"));
        assert!(BoardContext::from_config(&config).is_err());
    }

    #[test]
    fn test_load_reads_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.toml");
        std::fs::write(
            &path,
            format!(
                "[ordering]\nbase = 500.0\n\n[storage]\nroot = {:?}\n",
                temp.path().join("data").display().to_string()
            ),
        )
        .unwrap();

        let ctx = BoardContext::load(&ConfigProvider::from_files([path])).unwrap();
        assert_eq!(ctx.allocator().base(), 500.0);
    }

    #[test]
    fn test_load_surfaces_config_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.toml");

        let err = BoardContext::load(&ConfigProvider::from_files([missing])).unwrap_err();
        assert!(matches!(
            err,
            BoardError::Config(ConfigError::FileNotFound { .. })
        ));
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }
}
