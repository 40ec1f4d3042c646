use directories::ProjectDirs;
use report_model::REQUIRED_COLUMNS;
use report_storage::StoreLocation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("csv delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DatabaseConfig {
    InMemory,
    OnDisk { path: PathBuf },
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::InMemory
    }
}

impl DatabaseConfig {
    pub fn location(&self) -> StoreLocation {
        match self {
            DatabaseConfig::InMemory => StoreLocation::InMemory,
            DatabaseConfig::OnDisk { path } => StoreLocation::OnDisk(path.clone()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// Initial contents of the report name field.
    pub default_report_name: String,
    /// Initial contents of the report date field. Free-form.
    pub default_report_date: String,
    /// Schema given to a column-less table when a blank row is added.
    pub blank_row_columns: Vec<String>,
    pub csv_delimiter: char,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            default_report_name: "My Report".to_string(),
            default_report_date: "2024-01-01".to_string(),
            blank_row_columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            csv_delimiter: ',',
        }
    }
}

impl AppConfig {
    /// Load `explicit` if given, else the per-user config file if one exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.csv_delimiter_byte()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn csv_delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.csv_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ConfigError::InvalidDelimiter(self.csv_delimiter))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "reporteditor", "ReportEditor")?;
    Some(proj.config_dir().join(CONFIG_FILE_NAME))
}
