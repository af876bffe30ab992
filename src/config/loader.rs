//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading center
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{CenterError, CenterResult};
use crate::store::CenterStore;

use super::types::{CenterConfig, CenterMetadata, FinanceConfig, SyncSettings};

/// Loads and provides access to center configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/center/
/// ├── center.yaml   # Center metadata, sync and server settings
/// ├── finance.yaml  # Transaction categories and ledger thresholds
/// └── seed.yaml     # Sample data used when nothing has been saved yet
/// ```
///
/// # Example
///
/// ```no_run
/// use classroom_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/center").unwrap();
/// println!("Center: {}", loader.center().name);
/// println!("Seed classes: {}", loader.seed().classes.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    center: CenterConfig,
    finance: FinanceConfig,
    seed: CenterStore,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/center")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> CenterResult<Self> {
        let path = path.as_ref();

        let center = Self::load_yaml::<CenterConfig>(&path.join("center.yaml"))?;
        let finance = Self::load_yaml::<FinanceConfig>(&path.join("finance.yaml"))?;
        let seed = Self::load_yaml::<CenterStore>(&path.join("seed.yaml"))?;

        Ok(Self {
            center,
            finance,
            seed,
        })
    }

    /// Builds a loader from already-parsed parts.
    pub fn from_parts(center: CenterConfig, finance: FinanceConfig, seed: CenterStore) -> Self {
        Self {
            center,
            finance,
            seed,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> CenterResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| CenterError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| CenterError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the full `center.yaml` contents.
    pub fn center_config(&self) -> &CenterConfig {
        &self.center
    }

    /// Returns the center metadata.
    pub fn center(&self) -> &CenterMetadata {
        &self.center.center
    }

    /// Returns the cache and replication settings.
    pub fn sync(&self) -> &SyncSettings {
        &self.center.sync
    }

    /// Returns the finance settings.
    pub fn finance(&self) -> &FinanceConfig {
        &self.finance
    }

    /// Returns the sample data set.
    pub fn seed(&self) -> &CenterStore {
        &self.seed
    }
}
