use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::bridge::routing::Layout;

pub const CONFIG_FILE_NAME: &str = "moviestream.toml";
const MIN_TICK_MS: u64 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read-only application settings. Nothing is written back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: Layout,
    pub tick_interval_ms: u64,
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            layout: Layout::Unified,
            tick_interval_ms: 200,
            title: "MovieStream".to_string(),
            width: 800.0,
            height: 450.0,
            log_filter: "moviestream=info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Defaults, overlaid with the first config file found and then the
    /// environment. A broken file is reported and skipped.
    pub fn discover() -> (Self, Option<ConfigError>) {
        let mut config = AppConfig::default();
        let mut problem = None;
        if let Some(path) = candidate_paths().into_iter().find(|p| p.is_file()) {
            match Self::load_from_file(&path) {
                Ok(loaded) => config = loaded,
                Err(e) => problem = Some(e),
            }
        }
        config.apply_env(|key| std::env::var(key).ok());
        (config, problem)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(layout) = lookup("MOVIESTREAM_LAYOUT").and_then(|v| Layout::from_name(&v)) {
            self.layout = layout;
        }
        if let Some(ms) = lookup("MOVIESTREAM_TICK_MS").and_then(|v| v.trim().parse().ok()) {
            self.tick_interval_ms = ms;
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_MS))
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout, Layout::Unified);
        assert_eq!(config.tick_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "layout = \"split\"\ntick_interval_ms = 500").unwrap();
        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.layout, Layout::Split);
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.title, "MovieStream");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "layout = \"sideways\"").unwrap();
        assert!(matches!(
            AppConfig::load_from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            AppConfig::load_from_file(Path::new("/definitely/not/here.toml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([("MOVIESTREAM_LAYOUT", "split"), ("MOVIESTREAM_TICK_MS", "5")]);
        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.layout, Layout::Split);
        assert_eq!(config.tick_interval_ms, 5);
        assert_eq!(config.tick_interval(), Duration::from_millis(MIN_TICK_MS));
    }
}
