//! Global first-mate configuration.

use std::path::{Path, PathBuf};

use chrono::Duration;
use chrono_tz::Tz;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{ENOUGH_TIME_FOR_MEET_UP, LOCAL_TZ, ROUGHLY_THE_SAME_TIME};
use crate::error::{FirstMateError, FirstMateResult};
use crate::free_time::FreeTimeOptions;
use crate::overlap::MatchRules;

static DEFAULT_DATA_DIR: &str = "~/first-mate";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_timezone() -> String {
    LOCAL_TZ.name().to_string()
}

fn default_match_tolerance() -> String {
    format_minutes(ROUGHLY_THE_SAME_TIME)
}

fn default_meet_up_time() -> String {
    format_minutes(ENOUGH_TIME_FOR_MEET_UP)
}

fn default_weekdays_only() -> bool {
    true
}

fn format_minutes(duration: Duration) -> String {
    format!("{}m", duration.num_minutes())
}

/// Global configuration at ~/.config/first-mate/config.toml
///
/// Every key can be overridden with a `FIRSTMATE_` environment variable,
/// e.g. `FIRSTMATE_DATA_DIR`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FirstMateConfig {
    /// Where user records and calendars are stored
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// IANA timezone used for floating times and local days
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// How close class boundaries must be to count as a match, e.g. "15m"
    #[serde(default = "default_match_tolerance")]
    pub match_tolerance: String,

    /// Free time both students need around a boundary, e.g. "1h"
    #[serde(default = "default_meet_up_time")]
    pub meet_up_time: String,

    /// Skip weekends when looking for common free time
    #[serde(default = "default_weekdays_only")]
    pub weekdays_only: bool,
}

impl Default for FirstMateConfig {
    fn default() -> Self {
        FirstMateConfig {
            data_dir: default_data_dir(),
            timezone: default_timezone(),
            match_tolerance: default_match_tolerance(),
            meet_up_time: default_meet_up_time(),
            weekdays_only: default_weekdays_only(),
        }
    }
}

impl FirstMateConfig {
    pub fn config_path() -> FirstMateResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FirstMateError::Config("Could not determine config directory".into()))?
            .join("first-mate");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config, writing a commented default file on first run.
    pub fn load() -> FirstMateResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load the config from a specific file, with environment overrides.
    pub fn load_from(path: &Path) -> FirstMateResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("FIRSTMATE"))
            .build()
            .map_err(|e| FirstMateError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| FirstMateError::Config(e.to_string()))
    }

    /// The data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn tz(&self) -> FirstMateResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            FirstMateError::Config(format!("Unknown timezone '{}'", self.timezone))
        })
    }

    pub fn match_rules(&self) -> FirstMateResult<MatchRules> {
        Ok(MatchRules {
            tolerance: parse_duration("match_tolerance", &self.match_tolerance)?,
            meet_up: parse_duration("meet_up_time", &self.meet_up_time)?,
        })
    }

    pub fn free_time_options(&self) -> FreeTimeOptions {
        FreeTimeOptions {
            weekdays_only: self.weekdays_only,
            ..FreeTimeOptions::default()
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> FirstMateResult<()> {
        let contents = format!(
            "\
# first-mate configuration

# Where user profiles and timetables are stored:
# data_dir = \"{}\"

# Timezone used to read timetables:
# timezone = \"{}\"

# How close two classes' start or end times must be to count as a match:
# match_tolerance = \"{}\"

# How much free time you both need before or after class to meet up:
# meet_up_time = \"{}\"

# Only look for common free time on weekdays:
# weekdays_only = true
",
            DEFAULT_DATA_DIR,
            default_timezone(),
            default_match_tolerance(),
            default_meet_up_time(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FirstMateError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| FirstMateError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn parse_duration(key: &str, value: &str) -> FirstMateResult<Duration> {
    let std_duration = humantime::parse_duration(value)
        .map_err(|e| FirstMateError::Config(format!("Invalid {} '{}': {}", key, value, e)))?;

    Duration::from_std(std_duration)
        .map_err(|e| FirstMateError::Config(format!("Invalid {} '{}': {}", key, value, e)))
}
