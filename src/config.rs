use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Time between hiding the selector and grabbing the screen.
    pub capture_delay_ms: u64,
    pub overlay_alpha: f32,
    pub stroke_color: [u8; 4],
    pub stroke_width: f32,
    /// Appended to saved file names that have no extension.
    pub default_extension: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture_delay_ms: 80,
            overlay_alpha: 0.3,
            stroke_color: [255, 0, 0, 255],
            stroke_width: 2.0,
            default_extension: "png".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        PathBuf::from("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "stroke_width": 4.0 }"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.stroke_width, 4.0);
        assert_eq!(config.capture_delay_ms, 80);
        assert_eq!(config.default_extension, "png");
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }
}
