//! Taskboard configuration management using Figment
//!
//! Loads the numeric ordering constants, storage settings and the status
//! transition policy used by `taskboard-ordering`.
//!
//! # Precedence
//!
//! defaults → global file → project file → explicit files → environment
//!
//! - Global: `<config dir>/taskboard/config.{toml,yaml,yml,json}`
//! - Project: `./.taskboard/config.{toml,yaml,yml,json}`
//! - Environment: `TASKBOARD_` prefix, `__` between nested keys
//!
//! ```no_run
//! use taskboard_config::load_configuration;
//!
//! let config = load_configuration()?;
//! println!("spacing = {}", config.ordering.spacing);
//! # Ok::<(), taskboard_config::ConfigError>(())
//! ```
//!
//! ## Example TOML
//!
//! ```toml
//! [ordering]
//! base = 1000.0
//! spacing = 1000.0
//! min_gap = 0.000001
//!
//! [storage]
//! root = ".taskboard"
//! lock_timeout_ms = 5000
//!
//! [[transitions.denied]]
//! from = "BACKLOG"
//! to = "COMPLETED"
//! ```

mod discovery;
mod error;
mod provider;
mod types;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::{ConfigError, ConfigResult};
pub use provider::{load_configuration, ConfigProvider, ENV_PREFIX};
pub use types::{
    BoardConfig, OrderingConfig, StorageConfig, TransitionConfig, TransitionRule, DEFAULT_BASE,
    DEFAULT_MIN_GAP, DEFAULT_SPACING, DEFAULT_STORAGE_ROOT,
};
