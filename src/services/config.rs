//! User configuration (`~/.searchlead/config.json`)

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{LeadError, Result};

fn default_portal_delimiter() -> char {
    ';'
}

fn default_indicator() -> String {
    "Relative Sum Indicator".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Trends export used when `--trends` is not given
    #[serde(default)]
    pub trends_csv: Option<PathBuf>,
    /// Portal export used when `--portal` is not given
    #[serde(default)]
    pub portal_csv: Option<PathBuf>,
    #[serde(default = "default_portal_delimiter")]
    pub portal_delimiter: char,
    #[serde(default = "default_indicator")]
    pub default_indicator: String,
    /// Widen the window by a day on each side before filtering
    #[serde(default)]
    pub pad_window: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trends_csv: None,
            portal_csv: None,
            portal_delimiter: default_portal_delimiter(),
            default_indicator: default_indicator(),
            pad_window: false,
        }
    }
}

impl Config {
    /// Default location, if the home directory can be determined
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.home_dir().join(".searchlead").join("config.json"))
    }

    /// Load from `path`, or from the default location. A missing default
    /// file yields defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::load_from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| LeadError::Config(format!("{}: {}", path.display(), e)))?;
        let cfg: Config = serde_json::from_str(&data)
            .map_err(|e| LeadError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.delimiter_byte()?;
        Ok(cfg)
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.portal_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                LeadError::Config(format!(
                    "portal_delimiter must be an ASCII character, got '{}'",
                    self.portal_delimiter
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, contents).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.portal_delimiter, ';');
        assert_eq!(cfg.default_indicator, "Relative Sum Indicator");
        assert!(!cfg.pad_window);
        assert_eq!(cfg.delimiter_byte().unwrap(), b';');
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let (_dir, path) = write_config(r#"{"trends_csv": "/data/trends.csv", "pad_window": true}"#);
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.trends_csv, Some(PathBuf::from("/data/trends.csv")));
        assert!(cfg.pad_window);
        assert_eq!(cfg.portal_delimiter, ';');
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let (_dir, path) = write_config("{ not json");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, LeadError::Config(_)));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let (_dir, path) = write_config(r#"{"portal_delimiter": "§"}"#);
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/searchlead.json"))).unwrap_err();
        assert!(matches!(err, LeadError::Config(_)));
    }
}
