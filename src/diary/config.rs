use crate::error::{DiaryError, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const HOME_ENV: &str = "DIARY_HOME";
const DEFAULT_FILE_NAME_FORMAT: &str = "%m-%Y.md";
const DEFAULT_ENTRY_KEY_FORMAT: &str = "%d-%m-%Y";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for diary, stored in `<home>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiaryConfig {
    /// Folder holding the monthly files. Relative names resolve against the working directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// chrono format of the default file name
    #[serde(default = "default_file_name_format")]
    pub file_name_format: String,

    /// chrono format of the key offered when adding an entry
    #[serde(default = "default_entry_key_format")]
    pub entry_key_format: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_file_name_format() -> String {
    DEFAULT_FILE_NAME_FORMAT.to_string()
}

fn default_entry_key_format() -> String {
    DEFAULT_ENTRY_KEY_FORMAT.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name_format: default_file_name_format(),
            entry_key_format: default_entry_key_format(),
            log_level: default_log_level(),
        }
    }
}

impl DiaryConfig {
    /// Where config and logs live: `$DIARY_HOME`, or the platform config directory.
    pub fn home() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        ProjectDirs::from("com", "diary", "diary")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| DiaryError::Config("could not determine config directory".into()))
    }

    /// `config.json` inside `config_dir`.
    pub fn path<P: AsRef<Path>>(config_dir: P) -> PathBuf {
        config_dir.as_ref().join(CONFIG_FILENAME)
    }

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = Self::path(config_dir);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DiaryError::Io)?;
        let config: DiaryConfig =
            serde_json::from_str(&content).map_err(DiaryError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DiaryError::Io)?;
        }

        let config_path = Self::path(config_dir);
        let content = serde_json::to_string_pretty(self).map_err(DiaryError::Serialization)?;
        fs::write(config_path, content).map_err(DiaryError::Io)?;
        Ok(())
    }

    /// The file for the month of `today`, inside `directory` when one is set.
    pub fn default_file_path(&self, today: NaiveDate) -> Result<PathBuf> {
        let name = format_date(today, &self.file_name_format)?;
        Ok(match &self.directory {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        })
    }

    pub fn default_entry_key(&self, today: NaiveDate) -> Result<String> {
        format_date(today, &self.entry_key_format)
    }
}

// chrono reports bad specifiers as a fmt::Error at display time.
fn format_date(date: NaiveDate, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format))
        .map_err(|_| DiaryError::Config(format!("invalid date format `{}`", format)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = DiaryConfig::default();
        assert_eq!(config.directory, None);
        assert_eq!(config.file_name_format, "%m-%Y.md");
        assert_eq!(config.entry_key_format, "%d-%m-%Y");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_default_file_path() {
        let config = DiaryConfig::default();
        assert_eq!(
            config.default_file_path(day()).unwrap(),
            PathBuf::from("03-2024.md")
        );

        let config = DiaryConfig {
            directory: Some(PathBuf::from("/notes")),
            ..DiaryConfig::default()
        };
        assert_eq!(
            config.default_file_path(day()).unwrap(),
            PathBuf::from("/notes/03-2024.md")
        );
    }

    #[test]
    fn test_default_entry_key() {
        let config = DiaryConfig::default();
        assert_eq!(config.default_entry_key(day()).unwrap(), "07-03-2024");
    }

    #[test]
    fn test_invalid_format_is_an_error() {
        let config = DiaryConfig {
            entry_key_format: "%Q".to_string(),
            ..DiaryConfig::default()
        };
        assert!(matches!(
            config.default_entry_key(day()),
            Err(DiaryError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = DiaryConfig::load(dir.path().join("absent")).unwrap();
        assert_eq!(config, DiaryConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");

        let config = DiaryConfig {
            directory: Some(PathBuf::from("journal")),
            log_level: "debug".to_string(),
            ..DiaryConfig::default()
        };
        config.save(&home).unwrap();

        let loaded = DiaryConfig::load(&home).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"entry_key_format": "%Y-%m-%d"}"#,
        )
        .unwrap();

        let config = DiaryConfig::load(dir.path()).unwrap();
        assert_eq!(config.entry_key_format, "%Y-%m-%d");
        assert_eq!(config.file_name_format, "%m-%Y.md");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        assert!(matches!(
            DiaryConfig::load(dir.path()),
            Err(DiaryError::Serialization(_))
        ));
    }
}
