//! Configuration loading and management for the ledgers.
//!
//! This module loads pay rules and storage keys from YAML files, falling back
//! to built-in defaults where a file is optional.
//!
//! # Example
//!
//! ```no_run
//! use shift_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Extra hour rate: {}", config.pay_rules().extra_hour_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{LedgerConfig, PayRules, StorageKeys};
