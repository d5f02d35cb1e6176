//! Configuration loading and management
//!
//! Every field has a default, so an empty YAML document (or no file at all) is a
//! valid configuration. Environment variables are applied on top of the file.

use crate::core::error::ConfigError;
use crate::entities::product::LOW_STOCK_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Override the server bind address
pub const ENV_BIND_ADDR: &str = "CRM_BIND_ADDR";
/// Override the GraphQL endpoint used by jobs
pub const ENV_GRAPHQL_URL: &str = "CRM_GRAPHQL_URL";
/// Move every job log file into this directory (file names are kept)
pub const ENV_LOG_DIR: &str = "CRM_LOG_DIR";

/// Longest accepted reminder window (about a century)
pub const MAX_REMINDER_WINDOW_DAYS: i64 = 36_500;

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Low-stock remediation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Products with stock strictly below this are restocked
    pub low_stock_threshold: i32,

    /// Flat amount added to each low-stock product
    pub restock_increment: i32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            restock_increment: 10,
        }
    }
}

/// Scheduled job settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// GraphQL endpoint the jobs call
    pub graphql_url: String,

    /// Extra attempts after a failed request
    pub retries: u32,

    /// Orders placed within this many days get a reminder
    pub reminder_window_days: i64,

    pub heartbeat_log: PathBuf,
    pub order_reminders_log: PathBuf,
    pub low_stock_log: PathBuf,
    pub report_log: PathBuf,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            graphql_url: "http://localhost:8000/graphql".to_string(),
            retries: 3,
            reminder_window_days: 7,
            heartbeat_log: PathBuf::from("/tmp/crm_heartbeat_log.txt"),
            order_reminders_log: PathBuf::from("/tmp/order_reminders_log.txt"),
            low_stock_log: PathBuf::from("/tmp/low_stock_updates_log.txt"),
            report_log: PathBuf::from("/tmp/crm_report_log.txt"),
        }
    }
}

impl JobsConfig {
    /// Point every log file at `dir`, keeping the file names
    pub fn relocate_logs(&mut self, dir: &Path) {
        for path in [
            &mut self.heartbeat_log,
            &mut self.order_reminders_log,
            &mut self.low_stock_log,
            &mut self.report_log,
        ] {
            if let Some(name) = path.file_name() {
                *path = dir.join(name);
            }
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    pub server: ServerConfig,
    pub inventory: InventoryConfig,
    pub jobs: JobsConfig,
}

impl CrmConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str::<Self>(&content)
            .map_err(|e| ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            })?
            .validated()
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Self>(yaml)?.validated()
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validated()
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_BIND_ADDR).filter(|v| !v.is_empty()) {
            self.server.bind_addr = addr;
        }
        if let Some(url) = lookup(ENV_GRAPHQL_URL).filter(|v| !v.is_empty()) {
            self.jobs.graphql_url = url;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|v| !v.is_empty()) {
            self.jobs.relocate_logs(Path::new(&dir));
        }
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory.restock_increment <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "inventory.restock_increment".to_string(),
                value: self.inventory.restock_increment.to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.inventory.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue {
                field: "inventory.low_stock_threshold".to_string(),
                value: self.inventory.low_stock_threshold.to_string(),
                message: "cannot be negative".to_string(),
            });
        }
        if !(0..=MAX_REMINDER_WINDOW_DAYS).contains(&self.jobs.reminder_window_days) {
            return Err(ConfigError::InvalidValue {
                field: "jobs.reminder_window_days".to_string(),
                value: self.jobs.reminder_window_days.to_string(),
                message: format!("must be between 0 and {}", MAX_REMINDER_WINDOW_DAYS),
            });
        }
        Ok(())
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CrmConfig::default();

        assert_eq!(config.server.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.inventory.low_stock_threshold, 10);
        assert_eq!(config.inventory.restock_increment, 10);
        assert_eq!(config.jobs.graphql_url, "http://localhost:8000/graphql");
        assert_eq!(config.jobs.retries, 3);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = CrmConfig::from_yaml_str(
            r#"
inventory:
  restock_increment: 25
"#,
        )
        .unwrap();

        assert_eq!(config.inventory.restock_increment, 25);
        assert_eq!(config.inventory.low_stock_threshold, 10);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(CrmConfig::from_yaml_str("").unwrap(), CrmConfig::default());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = CrmConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = CrmConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_increment_rejected() {
        let err = CrmConfig::from_yaml_str("inventory:\n  restock_increment: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_reminder_window_bounds() {
        let yaml = format!("jobs:\n  reminder_window_days: {}\n", MAX_REMINDER_WINDOW_DAYS);
        assert!(CrmConfig::from_yaml_str(&yaml).is_ok());

        for days in [MAX_REMINDER_WINDOW_DAYS + 1, i64::MAX, -1] {
            let yaml = format!("jobs:\n  reminder_window_days: {}\n", days);
            let err = CrmConfig::from_yaml_str(&yaml).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref field, .. } if field == "jobs.reminder_window_days"
            ));
        }
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_BIND_ADDR, "0.0.0.0:9000"),
            (ENV_LOG_DIR, "/var/log/crm"),
        ]
        .into_iter()
        .collect();

        let mut config = CrmConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.jobs.graphql_url, "http://localhost:8000/graphql");
        assert_eq!(
            config.jobs.heartbeat_log,
            PathBuf::from("/var/log/crm/crm_heartbeat_log.txt")
        );
        assert_eq!(
            config.jobs.report_log,
            PathBuf::from("/var/log/crm/crm_report_log.txt")
        );
    }

    #[test]
    fn test_missing_file() {
        let err = CrmConfig::from_yaml_file("/nonexistent/crm.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
