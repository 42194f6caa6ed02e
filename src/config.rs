//! Configuration system for sundown with validation and default generation.
//!
//! Configuration lives in `sundown.toml` under the XDG config directory
//! (`~/.config/sundown/sundown.toml`). A commented default file is written
//! on first run. All values are validated against the limits in
//! [`crate::constants`] before use; invalid configurations fail loading
//! with messages that name the offending field and the accepted range.
//!
//! ## Schedule basis
//!
//! Exactly one schedule basis applies, in priority order:
//!
//! ```toml
//! # 1. Postal code lookup (requires an external location resolver)
//! zipcode = "10001"
//! country = "US"
//!
//! # 2. Explicit coordinates with automatic timezone detection
//! latitude = 40.7128
//! longitude = -74.0060
//!
//! # 3. Fixed local clock times (the fallback basis)
//! day_start = "08:00:00"
//! night_start = "20:00:00"
//! ```
//!
//! An optional `timezone` override applies to whichever basis is chosen.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_DAY_START, DEFAULT_DAY_TEMP, DEFAULT_NIGHT_START, DEFAULT_NIGHT_TEMP,
    DEFAULT_TRANSITION_MINUTES, DEFAULT_UPDATE_INTERVAL_SECS, MAXIMUM_TEMP,
    MAXIMUM_TRANSITION_MINUTES, MAXIMUM_UPDATE_INTERVAL_SECS, MINIMUM_TEMP,
    MINIMUM_TRANSITION_MINUTES, MINIMUM_UPDATE_INTERVAL_SECS,
};
use crate::logger::Log;

/// Application settings loaded from `sundown.toml`.
///
/// Every field is optional; defaults from [`crate::constants`] fill the
/// gaps, so an empty file is a valid configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Daytime color temperature in Kelvin.
    pub day_temp: Option<u32>,
    /// Nighttime color temperature in Kelvin.
    pub night_temp: Option<u32>,
    /// Transition duration in minutes before each day/night boundary.
    pub transition_minutes: Option<u32>,
    /// Seconds between scheduler ticks.
    pub update_interval: Option<u64>,
    /// Fixed-mode day start, local clock time "HH:MM:SS".
    pub day_start: Option<String>,
    /// Fixed-mode night start, local clock time "HH:MM:SS".
    pub night_start: Option<String>,
    /// Geographic latitude for sun-based scheduling.
    pub latitude: Option<f64>,
    /// Geographic longitude for sun-based scheduling.
    pub longitude: Option<f64>,
    /// Postal code for external location lookup.
    pub zipcode: Option<String>,
    /// Country code for the postal lookup (defaults to "US").
    pub country: Option<String>,
    /// IANA timezone override, e.g. "America/New_York".
    pub timezone: Option<String>,
}

impl Config {
    /// Path of the configuration file inside the XDG config directory.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("sundown").join("sundown.toml"))
    }

    /// Load the configuration, writing a commented default file first if
    /// none exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;
        if !path.exists() {
            Self::create_default_config(&path)?;
        }
        Self::load_from_path(&path)
    }

    /// Load and validate a configuration from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse configuration at {}", path.display()))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Write the commented default configuration to `path`.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }
        fs::write(path, DEFAULT_CONFIG_CONTENT)
            .with_context(|| format!("failed to write default config to {}", path.display()))?;
        Log::log_decorated(&format!(
            "Created default configuration at {}",
            path.display()
        ));
        Ok(())
    }

    /// Log the effective configuration.
    pub fn log_config(&self) {
        Log::log_block_start("Loaded configuration");
        Log::log_indented(&format!(
            "Day temperature: {}K",
            self.day_temp.unwrap_or(DEFAULT_DAY_TEMP)
        ));
        Log::log_indented(&format!(
            "Night temperature: {}K",
            self.night_temp.unwrap_or(DEFAULT_NIGHT_TEMP)
        ));
        Log::log_indented(&format!(
            "Transition duration: {} minutes",
            self.transition_minutes
                .unwrap_or(DEFAULT_TRANSITION_MINUTES)
        ));
        Log::log_indented(&format!(
            "Update interval: {}s",
            self.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL_SECS)
        ));

        if let Some(zipcode) = &self.zipcode {
            Log::log_indented(&format!(
                "Schedule anchor: postal code {} ({})",
                zipcode,
                self.country.as_deref().unwrap_or("US")
            ));
        } else if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            Log::log_indented(&format!(
                "Schedule anchor: coordinates {:.4}, {:.4}",
                latitude, longitude
            ));
        } else {
            Log::log_indented(&format!(
                "Schedule anchor: fixed {} - {}",
                self.day_start.as_deref().unwrap_or(DEFAULT_DAY_START),
                self.night_start.as_deref().unwrap_or(DEFAULT_NIGHT_START)
            ));
        }

        if let Some(timezone) = &self.timezone {
            Log::log_indented(&format!("Timezone override: {}", timezone));
        }
    }
}

/// Parse a "HH:MM:SS" clock time, naming the field in the error.
pub(crate) fn parse_clock_time(value: &str, field: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .with_context(|| format!("invalid {} time {:?}, expected HH:MM:SS", field, value))
}

/// Validate every configured value against the supported ranges.
pub fn validate_config(config: &Config) -> Result<()> {
    for (field, value) in [("day_temp", config.day_temp), ("night_temp", config.night_temp)] {
        if let Some(kelvin) = value {
            if !(MINIMUM_TEMP..=MAXIMUM_TEMP).contains(&kelvin) {
                anyhow::bail!(
                    "{} must be between {}K and {}K, got {}K",
                    field,
                    MINIMUM_TEMP,
                    MAXIMUM_TEMP,
                    kelvin
                );
            }
        }
    }

    if let Some(minutes) = config.transition_minutes {
        if !(MINIMUM_TRANSITION_MINUTES..=MAXIMUM_TRANSITION_MINUTES).contains(&minutes) {
            anyhow::bail!(
                "transition_minutes must be between {} and {}, got {}",
                MINIMUM_TRANSITION_MINUTES,
                MAXIMUM_TRANSITION_MINUTES,
                minutes
            );
        }
    }

    if let Some(seconds) = config.update_interval {
        if !(MINIMUM_UPDATE_INTERVAL_SECS..=MAXIMUM_UPDATE_INTERVAL_SECS).contains(&seconds) {
            anyhow::bail!(
                "update_interval must be between {}s and {}s, got {}s",
                MINIMUM_UPDATE_INTERVAL_SECS,
                MAXIMUM_UPDATE_INTERVAL_SECS,
                seconds
            );
        }
    }

    match (config.latitude, config.longitude) {
        (Some(latitude), Some(longitude)) => {
            if !(-90.0..=90.0).contains(&latitude) {
                anyhow::bail!(
                    "latitude must be between -90 and 90 degrees, got {}",
                    latitude
                );
            }
            if !(-180.0..=180.0).contains(&longitude) {
                anyhow::bail!(
                    "longitude must be between -180 and 180 degrees, got {}",
                    longitude
                );
            }
        }
        (None, None) => {}
        _ => anyhow::bail!("latitude and longitude must be configured together"),
    }

    if config.zipcode.is_some() && config.latitude.is_some() {
        anyhow::bail!("configure either zipcode or latitude/longitude, not both");
    }

    let day_start = match &config.day_start {
        Some(value) => Some(parse_clock_time(value, "day_start")?),
        None => None,
    };
    let night_start = match &config.night_start {
        Some(value) => Some(parse_clock_time(value, "night_start")?),
        None => None,
    };
    if let (Some(day), Some(night)) = (day_start, night_start) {
        if day == night {
            anyhow::bail!("day_start and night_start must differ");
        }
    }

    if let Some(timezone) = &config.timezone {
        if timezone.parse::<chrono_tz::Tz>().is_err() {
            anyhow::bail!("unknown timezone identifier: {:?}", timezone);
        }
    }

    Ok(())
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# sundown configuration
# All values are optional; the defaults shown here apply when omitted.

# Color temperatures in Kelvin (1000-40000)
day_temp = 6500
night_temp = 3400

# Transition duration in minutes before each day/night boundary (5-120)
transition_minutes = 60

# Seconds between scheduler ticks (1-300)
update_interval = 5

# Fixed schedule: local clock times marking day and night start
day_start = "08:00:00"
night_start = "20:00:00"

# Sun-based schedule: uncomment to anchor to sunrise/sunset instead
#latitude = 40.7128
#longitude = -74.0060

# Postal code lookup (requires an external location resolver)
#zipcode = "10001"
#country = "US"

# IANA timezone override; otherwise detected from coordinates,
# the TZ environment variable, and finally UTC
#timezone = "America/New_York"
"#;
