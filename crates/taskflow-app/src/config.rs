use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskflow_core::{IdGenerator, SequentialIds, SortOrder, TaskFilter, UuidV7Ids};
use taskflow_store::check_key;

use crate::persistence::DEFAULT_STORAGE_KEY;
use crate::service::ViewSelection;

/// File name looked up inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration loaded from `<data dir>/config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Where tasks are stored.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Initial filter and sort.
    #[serde(default)]
    pub view: ViewConfig,
    /// Id generation.
    #[serde(default)]
    pub ids: IdsConfig,
}

impl AppConfig {
    /// Load configuration from `data_dir`, falling back to defaults when the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = data_dir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse {}", config_path.display()))
    }

    /// Parse and validate configuration text.
    ///
    /// # Errors
    /// Returns an error on invalid TOML or invalid values.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let key = self.storage.key.as_str();
        if key.trim().is_empty() {
            bail!("storage key must not be empty");
        }
        if check_key(key).is_err() {
            bail!("storage key '{key}' may only contain letters, digits, '-', '_' and '.'");
        }
        Ok(())
    }

    /// Initial view selection.
    #[must_use]
    pub const fn selection(&self) -> ViewSelection {
        ViewSelection {
            filter: self.view.filter,
            sort: self.view.sort,
        }
    }
}

/// `[storage]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Key the task collection is saved under.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_owned()
}

/// `[view]` block: the selection a session starts with.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub struct ViewConfig {
    /// Starting filter.
    #[serde(default)]
    pub filter: TaskFilter,
    /// Starting sort order.
    #[serde(default)]
    pub sort: SortOrder,
}

/// `[ids]` block.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub struct IdsConfig {
    /// Generator used for new tasks.
    #[serde(default)]
    pub strategy: IdStrategy,
}

/// How new task ids are produced.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Time-ordered random UUIDs.
    #[default]
    Uuid,
    /// Counter starting after the largest stored id.
    Sequential,
}

impl IdStrategy {
    /// Fresh generator for this strategy.
    #[must_use]
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            Self::Uuid => Box::new(UuidV7Ids),
            Self::Sequential => Box::new(SequentialIds::new()),
        }
    }
}
