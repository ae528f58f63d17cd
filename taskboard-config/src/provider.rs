//! Configuration provider using Figment

use crate::discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
use crate::error::{ConfigError, ConfigResult};
use crate::types::BoardConfig;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Prefix for environment overrides, e.g. `TASKBOARD_ORDERING__MIN_GAP`
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Loads [`BoardConfig`] from all sources with a fixed precedence order.
///
/// Sources, later ones overriding earlier ones:
/// 1. Compiled defaults
/// 2. Configuration files (global, then project, then explicit)
/// 3. Environment variables with the `TASKBOARD_` prefix, `__` separating
///    nested keys
///
/// No caching is performed.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
    explicit: Vec<PathBuf>,
    skip_discovery: bool,
}

impl ConfigProvider {
    /// Provider that discovers files from the working directory and user config dir
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that reads only the given files (plus defaults and environment)
    pub fn from_files(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            discovery: FileDiscovery::new(),
            explicit: paths.into_iter().map(Into::into).collect(),
            skip_discovery: true,
        }
    }

    /// Use a custom discovery configuration
    pub fn with_discovery(mut self, discovery: FileDiscovery) -> Self {
        self.discovery = discovery;
        self.skip_discovery = false;
        self
    }

    /// Load and validate the configuration
    pub fn load(&self) -> ConfigResult<BoardConfig> {
        let config: BoardConfig = self.build_figment()?.extract()?;
        config.validate()?;
        info!(
            base = config.ordering.base,
            spacing = config.ordering.spacing,
            min_gap = config.ordering.min_gap,
            denied = config.transitions.denied.len(),
            "loaded board configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(BoardConfig::default()));

        if !self.skip_discovery {
            for file in self.discovery.discover_all() {
                figment = figment.merge(Self::file_provider(&file));
            }
        }

        for path in &self.explicit {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path: path.clone() });
            }
            let file = ConfigFile::from_path(path.clone(), ConfigScope::Explicit).ok_or_else(
                || ConfigError::UnsupportedFormat {
                    format: path
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("")
                        .to_string(),
                },
            )?;
            figment = figment.merge(Self::file_provider(&file));
        }

        debug!("merging environment overrides with prefix {ENV_PREFIX}");
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        trace!("loading config file: {} ({:?})", file.path.display(), file.format);
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }
}

/// Load configuration from the default discovery locations
pub fn load_configuration() -> ConfigResult<BoardConfig> {
    ConfigProvider::new().load()
}
