//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the fishing-tide.toml
//! file. It provides the default fishing spot, its UTC offset, and chart options.

use crate::curve::DEFAULT_SAMPLE_INTERVAL_MINUTES;
use crate::markers::DEFAULT_THRESHOLD_MINUTES;
use crate::Coordinates;
use chrono::{FixedOffset, Offset, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "fishing-tide.toml";

/// Application configuration loaded from fishing-tide.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default fishing spot
    pub location: LocationConfig,
    /// Chart sampling and marker options
    pub chart: ChartConfig,
}

/// Fishing spot used when no coordinates are given on the command line
#[derive(Debug, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Human-readable spot name for reference
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Local UTC offset in whole hours; fixes the calendar day of the chart
    pub utc_offset_hours: i32,
}

/// Chart configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct ChartConfig {
    /// Minutes between tide samples
    pub sample_interval_minutes: u32,
    /// Catches this many minutes apart share one marker
    pub marker_threshold_minutes: u32,
    /// Height of the ASCII chart in rows
    pub rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                name: "Osaka Bay".to_string(),
                latitude: 34.65,
                longitude: 135.2,
                utc_offset_hours: 9,
            },
            chart: ChartConfig {
                sample_interval_minutes: DEFAULT_SAMPLE_INTERVAL_MINUTES,
                marker_threshold_minutes: DEFAULT_THRESHOLD_MINUTES,
                rows: 20,
            },
        }
    }
}

impl LocationConfig {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// The configured offset, or UTC when it is out of range.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(
                    "UTC offset {}h is out of range, using UTC",
                    self.utc_offset_hours
                );
                Utc.fix()
            })
    }
}

impl Config {
    /// Load configuration from fishing-tide.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration for {}", config.location.name);
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration (Osaka Bay)");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found, using default configuration (Osaka Bay)");
                Self::default()
            }
        }
    }

    /// Save configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
