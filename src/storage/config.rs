use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::agenda::{FilterMode, WeekStart};

pub const APP_DIR_NAME: &str = "studio-manager";
pub const GOOGLE_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub agenda: AgendaConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarConfig {
    pub access_token: String,
    pub calendar_id: String,
    pub base_url: String,
}

impl CalendarConfig {
    pub fn is_configured(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgendaConfig {
    pub default_filter: FilterMode,
    pub first_day_of_week: WeekStart,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn app_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    pub fn config_path() -> PathBuf {
        Self::app_dir().join("config.toml")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig {
                access_token: String::new(),
                calendar_id: "primary".to_string(),
                base_url: GOOGLE_CALENDAR_BASE_URL.to_string(),
            },
            agenda: AgendaConfig {
                default_filter: FilterMode::Today,
                first_day_of_week: WeekStart::Monday,
            },
            storage: StorageConfig {
                database_path: Self::app_dir().join("studio.db"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_filters_today() {
        let config = Config::default();
        assert_eq!(config.agenda.default_filter, FilterMode::Today);
    }

    #[test]
    fn default_config_starts_weeks_on_monday() {
        let config = Config::default();
        assert_eq!(config.agenda.first_day_of_week, WeekStart::Monday);
    }

    #[test]
    fn default_config_has_no_calendar_credentials() {
        let config = Config::default();
        assert!(!config.calendar.is_configured());
        assert_eq!(config.calendar.calendar_id, "primary");
    }

    #[test]
    fn parse_valid_toml_config() {
        let toml_content = r#"
            [calendar]
            access_token = "ya29.token"
            calendar_id = "studio@group.calendar.google.com"
            base_url = "http://localhost:9000"

            [agenda]
            default_filter = "this_week"
            first_day_of_week = "Sunday"

            [storage]
            database_path = "/tmp/studio.db"
        "#;

        let config = Config::from_toml(toml_content).unwrap();

        assert!(config.calendar.is_configured());
        assert_eq!(config.agenda.default_filter, FilterMode::ThisWeek);
        assert_eq!(config.agenda.first_day_of_week, WeekStart::Sunday);
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/studio.db"));
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let invalid_toml = "this is not valid toml";
        let result = Config::from_toml(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn saved_config_can_be_read_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.agenda.default_filter = FilterMode::ThisMonth;

        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(Config::from_toml(&content).unwrap(), config);
    }
}
