//! Shimmer configuration system
//!
//! This crate loads shimmer settings from `shimmer.toml`, with environment
//! variables layered on top for quick overrides. Values are kept as plain data
//! here; `shimmer-scene` validates them into a `ShimmerConfig`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name looked up by [`ShimmerFileConfig::load_or_default`].
pub const DEFAULT_CONFIG_FILE: &str = "shimmer.toml";

/// Errors raised while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShimmerFileConfig {
    /// Timing and loop settings
    pub animation: AnimationSection,
    /// Gradient colors
    pub colors: ColorSection,
    /// Settings for the headless demo binary
    pub demo: DemoSection,
}

/// Animation timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSection {
    /// Duration of one sweep in milliseconds
    pub period_ms: f64,
    /// Idle time between sweeps in milliseconds
    pub delay_ms: f64,
    /// Number of sweeps; 0 (or negative) loops forever
    pub loop_count: i64,
    /// Sweep direction name (left_to_right, top_to_bottom, right_to_left, bottom_to_top, slanted)
    pub direction: String,
    /// Flip the sweep by 180 degrees
    pub reversed: bool,
    /// Whether the animation runs at all
    pub enabled: bool,
}

/// Gradient color configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSection {
    /// Base (resting) color as `#RRGGBB` or `#RRGGBBAA`
    pub base: String,
    /// Highlight color at the centre of the band
    pub highlight: String,
    /// Explicit stop list; when non-empty it replaces base/highlight
    pub stops: Vec<StopEntry>,
}

/// One explicit gradient stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopEntry {
    /// Position in [0, 1]
    pub offset: f64,
    /// Color as `#RRGGBB` or `#RRGGBBAA`
    pub color: String,
}

/// Demo binary configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSection {
    /// Content width the mask is computed against
    pub width: f64,
    /// Content height the mask is computed against
    pub height: f64,
    /// Synthetic frame interval in milliseconds
    pub frame_ms: f64,
    /// How long the demo runs, in milliseconds
    pub duration_ms: f64,
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            period_ms: 1500.0,
            delay_ms: 0.0,
            loop_count: 0,
            direction: "left_to_right".to_string(),
            reversed: false,
            enabled: true,
        }
    }
}

impl Default for ColorSection {
    fn default() -> Self {
        Self {
            base: "#E0E0E0".to_string(),
            highlight: "#F5F5F5".to_string(),
            stops: Vec::new(),
        }
    }
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 48.0,
            frame_ms: 1000.0 / 60.0,
            duration_ms: 3000.0,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let val = std::env::var(name).ok()?;
    match val.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("ignoring {name}={val:?}: not a valid number");
            None
        }
    }
}

impl ShimmerFileConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from `shimmer.toml` in the current directory,
    /// or return the default configuration if the file is missing or invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io { .. }) => Self::default(),
            Err(err) => {
                log::warn!("{err}; falling back to defaults");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Some(period) = parse_env::<f64>("SHIMMER_PERIOD_MS") {
            self.animation.period_ms = period;
        }
        if let Some(delay) = parse_env::<f64>("SHIMMER_DELAY_MS") {
            self.animation.delay_ms = delay;
        }
        if let Some(count) = parse_env::<i64>("SHIMMER_LOOP") {
            self.animation.loop_count = count;
        }
        if let Ok(direction) = std::env::var("SHIMMER_DIRECTION") {
            self.animation.direction = direction;
        }
        if let Ok(val) = std::env::var("SHIMMER_REVERSED") {
            self.animation.reversed = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("SHIMMER_ENABLED") {
            self.animation.enabled = parse_flag(&val);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from shimmer.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShimmerFileConfig::default();
        assert_eq!(config.animation.period_ms, 1500.0);
        assert_eq!(config.animation.delay_ms, 0.0);
        assert_eq!(config.animation.loop_count, 0);
        assert_eq!(config.animation.direction, "left_to_right");
        assert!(config.animation.enabled);
        assert!(!config.animation.reversed);
        assert!(config.colors.stops.is_empty());
    }

    #[test]
    fn test_toml_serialization() {
        let config = ShimmerFileConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ShimmerFileConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ShimmerFileConfig::from_toml_str(
            r##"
            [animation]
            period_ms = 1000
            loop_count = 2
            direction = "slanted"

            [[colors.stops]]
            offset = 0.0
            color = "#000000"

            [[colors.stops]]
            offset = 1.0
            color = "#ffffff"
            "##,
        )
        .unwrap();

        assert_eq!(config.animation.period_ms, 1000.0);
        assert_eq!(config.animation.loop_count, 2);
        assert_eq!(config.animation.direction, "slanted");
        assert!(config.animation.enabled);
        assert_eq!(config.colors.stops.len(), 2);
        assert_eq!(config.colors.base, "#E0E0E0");
        assert_eq!(config.demo, DemoSection::default());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = ShimmerFileConfig::from_toml_str("[animation]\nperiod_ms = \"slow\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ShimmerFileConfig::load_from_file("definitely/not/here/shimmer.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("SHIMMER_PERIOD_MS", "900");
            std::env::set_var("SHIMMER_LOOP", "not-a-number");
            std::env::set_var("SHIMMER_DIRECTION", "bottom_to_top");
            std::env::set_var("SHIMMER_REVERSED", "true");
        }

        let mut config = ShimmerFileConfig::default();
        config.merge_with_env();

        assert_eq!(config.animation.period_ms, 900.0);
        assert_eq!(config.animation.loop_count, 0);
        assert_eq!(config.animation.direction, "bottom_to_top");
        assert!(config.animation.reversed);

        unsafe {
            std::env::remove_var("SHIMMER_PERIOD_MS");
            std::env::remove_var("SHIMMER_LOOP");
            std::env::remove_var("SHIMMER_DIRECTION");
            std::env::remove_var("SHIMMER_REVERSED");
        }
    }
}
