use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::Language;
use crate::plan::PlanParams;
use crate::source::SourceOptions;
use crate::tracker::TrackerConfig;

/// Main application configuration
///
/// `language` sits before the table-valued sections so the TOML writer can
/// emit it as a top-level value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default display language (the store's persisted choice wins)
    pub language: Language,

    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// The race being trained for
    pub race: RaceConfig,

    /// Training plan ramp parameters
    pub plan: PlanParams,

    /// Tracking engine noise thresholds
    pub tracker: TrackerConfig,

    /// Advisory position-source hints
    pub source: SourceOptions,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Race settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Display name of the race
    pub name: String,

    /// Fixed race date the plan counts down to
    pub date: NaiveDate,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            language: Language::default(),
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                updated_at: Utc::now(),
            },
            race: RaceConfig::default(),
            plan: PlanParams::default(),
            tracker: TrackerConfig::default(),
            source: SourceOptions::default(),
        }
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig {
            name: "San Silvestre Murcia".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date"),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".raceday")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(_) => Self::default(),
        }
    }
}
