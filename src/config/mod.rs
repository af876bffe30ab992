//! Configuration loading and management for the classroom ledger.
//!
//! This module loads the center's YAML configuration: metadata and sync
//! settings, finance categories and thresholds, and the sample data set.
//!
//! # Example
//!
//! ```no_run
//! use classroom_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/center").unwrap();
//! println!("Loaded center: {}", config.center().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CenterConfig, CenterMetadata, FinanceConfig, ServerSettings, SyncSettings};
