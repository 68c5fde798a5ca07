//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading ledger
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};

use super::types::{LedgerConfig, PayRules, StorageKeys};

/// Loads and provides access to ledger configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── pay_rules.yaml   # Salary tiers and hourly rate
/// └── storage.yaml     # Storage keys (optional, defaults apply)
/// ```
///
/// # Example
///
/// ```no_run
/// use shift_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("First shift wage: {}", loader.pay_rules().first_full_shift_wage);
/// # Ok::<(), shift_ledger::error::LedgerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// `pay_rules.yaml` is required. `storage.yaml` is optional; when it is
    /// absent the default storage keys are used.
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();

        let pay_rules = Self::load_yaml::<PayRules>(&path.join("pay_rules.yaml"))?;

        let storage_path = path.join("storage.yaml");
        let storage = if storage_path.exists() {
            Self::load_yaml::<StorageKeys>(&storage_path)?
        } else {
            StorageKeys::default()
        };

        Ok(Self {
            config: LedgerConfig::new(pay_rules, storage),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying ledger configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Returns the pay rules.
    pub fn pay_rules(&self) -> &PayRules {
        self.config.pay_rules()
    }

    /// Returns the storage keys.
    pub fn storage(&self) -> &StorageKeys {
        self.config.storage()
    }
}
