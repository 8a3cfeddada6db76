//! Studio Configuration
//!
//! Remote store endpoint and credentials, stored as a JSON file in the
//! host's data directory. Environment variables win over the file so a
//! deployment can repoint the client without touching disk.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const BASE_URL_ENV: &str = "COURSE_STUDIO_BASE_URL";
pub const TOKEN_ENV: &str = "COURSE_STUDIO_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token: None,
        }
    }
}

impl StudioConfig {
    /// Read the config file; a missing or unreadable file yields None
    pub fn load(path: &Path) -> Option<Self> {
        let raw = fs::read_to_string(path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let raw = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, raw)
    }

    /// Environment variables win over file values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                self.token = Some(token);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("studio_config.json");

        let config = StudioConfig {
            base_url: "https://academy.example.com".to_string(),
            token: Some("secret".to_string()),
        };
        config.save(&path).expect("save");

        assert_eq!(StudioConfig::load(&path), Some(config));
    }

    #[test]
    fn test_missing_file_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(StudioConfig::load(&dir.path().join("nope.json")), None);
    }

    #[test]
    fn test_token_defaults_to_none() {
        let config: StudioConfig =
            serde_json::from_str(r#"{"base_url":"https://a.example.com"}"#).expect("parse");
        assert_eq!(config.token, None);
    }
}
