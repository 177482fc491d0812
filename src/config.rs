//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treestore/treestore.toml`
//! 3. Local config: `<dir>/.treestore.toml`
//! 4. Environment variables: `TREESTORE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::{IndexOptions, OrphanPolicy, RecordId, DEFAULT_ROOT_SENTINEL};

/// Unified configuration for treestore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Parent value marking the root record (default: "root").
    /// Integers in TOML or env stay integers, so `0` matches a JSON parent `0`.
    pub root_sentinel: RecordId,
    /// What to do with records whose parent is not in the tree
    pub orphan_policy: OrphanPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_sentinel: RecordId::from(DEFAULT_ROOT_SENTINEL),
            orphan_policy: OrphanPolicy::default(),
        }
    }
}

/// Get the XDG config directory for treestore.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treestore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treestore.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treestore.toml")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treestore.toml`
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        let local = local_dir
            .map(local_config_path)
            .filter(|path| path.exists());
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Load settings from explicit file locations, then apply `TREESTORE_*` overrides.
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut builder = Config::builder()
            .set_default("root_sentinel", DEFAULT_ROOT_SENTINEL)
            .map_err(config_err)?
            .set_default("orphan_policy", "skip")
            .map_err(config_err)?;

        for path in [global, local].into_iter().flatten() {
            debug!(path = %path.display(), "config file");
            builder =
                builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        // TREESTORE_ORPHAN_POLICY, not TREESTORE__ORPHAN_POLICY
        builder = builder.add_source(
            Environment::with_prefix("TREESTORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if matches!(&self.root_sentinel, RecordId::Str(s) if s.trim().is_empty()) {
            return Err(ApplicationError::Config {
                message: "root_sentinel must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Index construction options derived from these settings.
    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            root_sentinel: self.root_sentinel.clone(),
            orphan_policy: self.orphan_policy,
        }
    }
}
