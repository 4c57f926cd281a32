use crate::domain::SortKey;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User settings stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// flexi_logger spec, e.g. "info" or "debug"
    pub log_level: String,
    /// View used by `list` when no --filter is given
    pub default_filter: String,
    /// Order used by `list` when no --sort is given
    pub default_sort: SortKey,
    /// Initial length of a focus session in minutes
    pub focus_minutes: u32,
    /// Try desktop notifications before falling back to a terminal alert
    pub desktop_notifications: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_filter: "all".to_string(),
            default_sort: SortKey::CreatedAt,
            focus_minutes: 25,
            desktop_notifications: true,
        }
    }
}

/// Load config from config.json, falling back to defaults when the file is missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    Ok(config)
}

/// Save config to config.json
pub fn save_config<P: AsRef<Path>>(path: P, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = tempdir().unwrap();
        let config = load_config(temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.focus_minutes, 25);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_sort": "priority"}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.default_sort, SortKey::Priority);
        assert_eq!(config.log_level, "info");
        assert!(config.desktop_notifications);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let config = AppConfig {
            log_level: "debug".to_string(),
            default_filter: "pending".to_string(),
            focus_minutes: 50,
            ..AppConfig::default()
        };
        save_config(&path, &config).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(load_config(&path).is_err());
    }
}
