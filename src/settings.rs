use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ExtratoError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default)]
    pub primary_person_id: Option<String>,
}

fn default_service_url() -> String {
    "https://api.tela.com/v2".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            service_url: default_service_url(),
            primary_person_id: None,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("extrato")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("extrato")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ExtratoError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

/// The extraction-service credential comes from the environment, never
/// the settings file.
pub fn api_key() -> Result<String> {
    std::env::var("TELA_API_KEY")
        .map_err(|_| ExtratoError::Settings("TELA_API_KEY environment variable is required".to_string()))
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/extrato-test".to_string(),
            service_url: "https://example.test/v2".to_string(),
            primary_person_id: Some("p-1".to_string()),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let loaded: Settings = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.data_dir, "/tmp/extrato-test");
        assert_eq!(loaded.service_url, "https://example.test/v2");
        assert_eq!(loaded.primary_person_id.as_deref(), Some("p-1"));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let json = r#"{"data_dir": "/tmp/extrato-test"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.service_url, default_service_url());
        assert!(s.primary_person_id.is_none());
    }

    #[test]
    fn test_defaults_are_populated() {
        let s = Settings::default();
        assert!(!s.data_dir.is_empty());
        assert!(s.service_url.starts_with("https://"));
    }
}
