//! User settings for ledgerview
//!
//! Display currency, the owner used when `--owner` is not given, the retry
//! budget for snapshot fetches, and the default log filter.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::OwnerId;

/// User settings, persisted as config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Symbol printed in front of amounts on the terminal
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Owner whose ledger is used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,

    /// How many times a superseded snapshot fetch is retried
    #[serde(default = "default_snapshot_attempts")]
    pub snapshot_attempts: u32,

    /// tracing filter used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Where `export` writes files; defaults to `<base>/exports`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₱".to_string()
}

fn default_snapshot_attempts() -> u32 {
    3
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_owner: None,
            snapshot_attempts: default_snapshot_attempts(),
            log_filter: default_log_filter(),
            export_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until `init` or `config` asks for it
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.snapshot_attempts == 0 {
            return Err(LedgerError::Config(
                "snapshot_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The configured default owner, if any
    pub fn owner(&self) -> Option<OwnerId> {
        self.default_owner
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(OwnerId::new)
    }

    /// Resolved export directory
    pub fn export_dir(&self, paths: &LedgerPaths) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| paths.export_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "₱");
        assert_eq!(settings.snapshot_attempts, 3);
        assert_eq!(settings.log_filter, "warn");
        assert!(settings.owner().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            currency_symbol: "$".into(),
            default_owner: Some("alice".into()),
            snapshot_attempts: 5,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.owner(), Some(OwnerId::new("alice")));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"currency_symbol":"€"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.snapshot_attempts, 3);
        assert_eq!(loaded.export_dir(&paths), paths.export_dir());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let settings = Settings {
            snapshot_attempts: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(LedgerError::Config(_))));
    }
}
