//! Configuration types for the classroom ledger.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Identifying information about the training center.
#[derive(Debug, Clone, Deserialize)]
pub struct CenterMetadata {
    /// Short code for the center (e.g., "KAT").
    pub code: String,
    /// The human-readable name of the center.
    pub name: String,
    /// Key of the single persisted document holding all center data.
    pub record_id: String,
}

/// Settings for local caching and remote replication.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    /// Quiet period before a remote write, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Directory of the local durable cache.
    pub cache_dir: PathBuf,
    /// Key the blob is cached under.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
    /// Directory standing in for the remote document store; none runs offline.
    #[serde(default)]
    pub remote_dir: Option<PathBuf>,
    /// Directory snapshot exports are written to.
    pub export_dir: PathBuf,
    /// File name prefix of snapshot exports.
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_cache_key() -> String {
    "KAT_EDU_ALL_DATA".to_string()
}

fn default_export_prefix() -> String {
    "KAT_EDU_BACKUP".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address the API listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

/// Structure of `center.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CenterConfig {
    /// Center metadata.
    pub center: CenterMetadata,
    /// Cache and replication settings.
    pub sync: SyncSettings,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSettings,
}

/// Structure of `finance.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FinanceConfig {
    /// Suggested categories for income entries.
    pub income_categories: Vec<String>,
    /// Suggested categories for expense entries.
    pub expense_categories: Vec<String>,
    /// Category of transactions emitted for tuition payments.
    #[serde(default = "default_tuition_category")]
    pub tuition_category: String,
    /// An enrollment with this many sessions left or fewer is expiring.
    #[serde(default = "default_expiring_threshold")]
    pub expiring_threshold: u32,
    /// Teacher pay offered for a makeup lesson when none is given.
    #[serde(default = "default_makeup_pay")]
    pub default_makeup_pay: Decimal,
}

fn default_tuition_category() -> String {
    "Tuition".to_string()
}

fn default_expiring_threshold() -> u32 {
    2
}

fn default_makeup_pay() -> Decimal {
    Decimal::new(200_000, 0)
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            income_categories: vec![
                "Tuition".to_string(),
                "Textbook sales".to_string(),
                "Events".to_string(),
                "Other".to_string(),
            ],
            expense_categories: vec![
                "Teacher salary".to_string(),
                "Rent".to_string(),
                "Utilities".to_string(),
                "Marketing".to_string(),
                "Facilities".to_string(),
                "Other".to_string(),
            ],
            tuition_category: default_tuition_category(),
            expiring_threshold: default_expiring_threshold(),
            default_makeup_pay: default_makeup_pay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_config_defaults() {
        let yaml = r#"
center:
  code: KAT
  name: KAT Education
  record_id: kat_edu_master_data
sync:
  cache_dir: ./data/cache
  export_dir: ./data/exports
"#;
        let config: CenterConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sync.debounce_ms, 2000);
        assert_eq!(config.sync.cache_key, "KAT_EDU_ALL_DATA");
        assert!(config.sync.remote_dir.is_none());
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_finance_config_defaults() {
        let yaml = r#"
income_categories: [Tuition, Other]
expense_categories: [Rent]
"#;
        let config: FinanceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tuition_category, "Tuition");
        assert_eq!(config.expiring_threshold, 2);
        assert_eq!(config.default_makeup_pay, Decimal::new(200_000, 0));
    }
}
