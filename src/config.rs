//! Configuration file parser for ~/.config/shelf/config.toml.
//!
//! The config file is optional. A missing or empty file yields
//! `Config::default()`; unknown keys are accepted and logged as warnings.
use crate::feed::Category;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Catalog root. HTTPS unless it points at localhost.
    pub catalog_base_url: String,

    /// Per-request timeout for catalog fetches.
    pub request_timeout_secs: u64,

    /// Rows from the bottom of the list at which the next page is requested.
    pub scroll_threshold_rows: usize,

    /// Category tab selected at startup.
    pub default_category: String,

    /// Quiet period after the last keystroke before a search runs.
    pub search_debounce_ms: u64,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            catalog_base_url: crate::catalog::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 20,
            scroll_threshold_rows: 5,
            default_category: "all".to_string(),
            search_debounce_ms: 300,
            keybindings: HashMap::new(),
        }
    }
}

const KNOWN_KEYS: [&str; 7] = [
    "theme",
    "catalog_base_url",
    "request_timeout_secs",
    "scroll_threshold_rows",
    "default_category",
    "search_debounce_ms",
    "keybindings",
];

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// `~/.config/shelf/config.toml`, or `None` when `HOME` is unset.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".config").join("shelf").join("config.toml"))
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Out-of-range values → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            catalog = %config.catalog_base_url,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        self.default_category()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn default_category(&self) -> Result<Category, ConfigError> {
        self.default_category
            .parse()
            .map_err(|e: crate::feed::UnknownCategory| ConfigError::Invalid {
                key: "default_category",
                reason: e.to_string(),
            })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("shelf_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.catalog_base_url, "https://openlibrary.org");
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
        assert_eq!(config.scroll_threshold_rows, 5);
        assert_eq!(config.default_category().unwrap(), Category::All);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/shelf_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.scroll_threshold_rows, 5);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let (dir, path) = write_config(
            "full",
            r#"
theme = "light"
catalog_base_url = "http://127.0.0.1:9000"
request_timeout_secs = 5
scroll_threshold_rows = 10
default_category = "science"
search_debounce_ms = 150

[keybindings]
quit = "Ctrl+q"
load_more = "F5"
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.catalog_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.scroll_threshold_rows, 10);
        assert_eq!(config.default_category().unwrap(), Category::Science);
        assert_eq!(config.search_debounce_ms, 150);
        assert_eq!(
            config.keybindings.get("load_more").map(String::as_str),
            Some("F5")
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("partial", "default_category = \"fantasy\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_category().unwrap(), Category::Fantasy);
        assert_eq!(config.request_timeout_secs, 20);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "theme = \"dark\"\nmax_books = 3\n");
        assert!(Config::load(&path).is_ok());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_category_rejected() {
        let (dir, path) = write_config("category", "default_category = \"poetry\"\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "default_category", .. }));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let (dir, path) = write_config("timeout", "request_timeout_secs = 0\n");
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Invalid { key: "request_timeout_secs", .. })
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        std::fs::remove_dir_all(&dir).ok();
    }
}
