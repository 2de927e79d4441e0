//! # Park-on-pause configuration
//!
//! Settings are read once at the load boundary and validated there, so the
//! rest of the crate only ever sees typed values.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [park]
//! enableParkOnPause = true
//! profileScope = "select"
//! selectedProfileIds = ["prusa_mk3"]
//! parkLocation = "max_min"
//! liftZ = 10.0
//! speedPolicy = "custom"
//! customSpeedXY = 150.0
//! customSpeedZ = 10.0
//!
//! [profile]
//! id = "prusa_mk3"
//! volume = { width = 250.0, depth = 210.0, height = 210.0 }
//! axes = { x = { speed = 9000.0 }, y = { speed = 9000.0 }, z = { speed = 720.0 } }
//! ```
//!
//! The original host setting names (`profileMode`, `parkPosX`, `parkSpeedXY`, ...)
//! are accepted as aliases.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

use crate::profile::PrinterProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level file layout for the `park-host` binary.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HostConfig {
    #[serde(default)]
    pub park: ParkConfig,
    /// Printer profile reported to the controller. Absent means "no profile".
    #[serde(default)]
    pub profile: Option<PrinterProfile>,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuntimeConfig {
    /// Capacity of the host request channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Whether parking applies to every printer profile or a selected subset.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileScope {
    #[default]
    All,
    #[serde(alias = "selected")]
    Select,
}

/// Where the toolhead goes while the print is paused.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParkLocation {
    #[default]
    Center,
    #[serde(rename = "min", alias = "min_min")]
    MinMin,
    MinMax,
    MaxMin,
    #[serde(rename = "max", alias = "max_max")]
    MaxMax,
    Custom,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPolicy {
    /// Derive speeds from the printer profile's axis limits.
    #[default]
    Auto,
    Custom,
}

/// Park-on-pause settings. Custom speeds are in mm/s, distances in mm.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParkConfig {
    #[serde(default = "default_enabled")]
    pub enable_park_on_pause: bool,
    #[serde(default, alias = "profileMode")]
    pub profile_scope: ProfileScope,
    #[serde(default, alias = "selectedProfiles")]
    pub selected_profile_ids: BTreeSet<String>,
    #[serde(default)]
    pub home_before_unpark: bool,
    #[serde(default)]
    pub park_location: ParkLocation,
    #[serde(default, alias = "parkPosX")]
    pub custom_park_x: f64,
    #[serde(default, alias = "parkPosY")]
    pub custom_park_y: f64,
    #[serde(default = "default_lift_z", alias = "parkLiftZ")]
    pub lift_z: f64,
    #[serde(default, alias = "parkSpeed")]
    pub speed_policy: SpeedPolicy,
    #[serde(default = "default_speed_xy", rename = "customSpeedXY", alias = "parkSpeedXY")]
    pub custom_speed_xy: f64,
    #[serde(default = "default_speed_z", rename = "customSpeedZ", alias = "parkSpeedZ")]
    pub custom_speed_z: f64,
}

impl Default for ParkConfig {
    fn default() -> Self {
        Self {
            enable_park_on_pause: default_enabled(),
            profile_scope: ProfileScope::default(),
            selected_profile_ids: BTreeSet::new(),
            home_before_unpark: false,
            park_location: ParkLocation::default(),
            custom_park_x: 0.0,
            custom_park_y: 0.0,
            lift_z: default_lift_z(),
            speed_policy: SpeedPolicy::default(),
            custom_speed_xy: default_speed_xy(),
            custom_speed_z: default_speed_z(),
        }
    }
}

impl ParkConfig {
    /// Parse host-style JSON settings (the shape a plugin settings store hands out).
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: ParkConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce nonsense motion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("customParkX", self.custom_park_x),
            ("customParkY", self.custom_park_y),
            ("liftZ", self.lift_z),
            ("customSpeedXY", self.custom_speed_xy),
            ("customSpeedZ", self.custom_speed_z),
        ];
        for (key, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{} must be a finite number", key)));
            }
        }
        if self.lift_z < 0.0 {
            return Err(ConfigError::Invalid("liftZ must be >= 0".to_string()));
        }
        // Custom speeds double as the fallback when a profile is missing.
        if self.custom_speed_xy <= 0.0 {
            return Err(ConfigError::Invalid("customSpeedXY must be > 0".to_string()));
        }
        if self.custom_speed_z <= 0.0 {
            return Err(ConfigError::Invalid("customSpeedZ must be > 0".to_string()));
        }
        if self.profile_scope == ProfileScope::Select && self.selected_profile_ids.is_empty() {
            tracing::warn!("profileScope is 'select' but no profiles are selected; parking is effectively disabled");
        }
        Ok(())
    }
}

// Default value functions
fn default_enabled() -> bool { true }
fn default_lift_z() -> f64 { 5.0 }
fn default_speed_xy() -> f64 { 100.0 }
fn default_speed_z() -> f64 { 20.0 }
fn default_channel_capacity() -> usize { 16 }

/// Load and validate a host configuration from a TOML file at the given path.
pub fn load_config(path: impl AsRef<Path>) -> Result<HostConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read config file '{}': {}", path.display(), e);
        ConfigError::Io(e)
    })?;
    let config: HostConfig = toml::from_str(&contents).map_err(|e| {
        tracing::error!("Failed to parse config TOML: {}", e);
        ConfigError::Toml(e)
    })?;
    config.park.validate()?;
    if let Some(profile) = &config.profile {
        profile.validate()?;
    }
    if config.runtime.channel_capacity == 0 {
        return Err(ConfigError::Invalid("runtime.channel_capacity must be > 0".to_string()));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = ParkConfig::default();
        assert!(config.enable_park_on_pause);
        assert_eq!(config.profile_scope, ProfileScope::All);
        assert!(config.selected_profile_ids.is_empty());
        assert!(!config.home_before_unpark);
        assert_eq!(config.park_location, ParkLocation::Center);
        assert_eq!(config.custom_park_x, 0.0);
        assert_eq!(config.custom_park_y, 0.0);
        assert_eq!(config.lift_z, 5.0);
        assert_eq!(config.speed_policy, SpeedPolicy::Auto);
        assert_eq!(config.custom_speed_xy, 100.0);
        assert_eq!(config.custom_speed_z, 20.0);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ParkConfig::from_json(json!({})).unwrap();
        assert_eq!(config, ParkConfig::default());
    }

    #[test]
    fn test_host_setting_aliases() {
        let config = ParkConfig::from_json(json!({
            "profileMode": "select",
            "selectedProfiles": ["ender3"],
            "parkLocation": "max",
            "parkPosX": 12.5,
            "parkPosY": 7,
            "parkLiftZ": 2,
            "parkSpeed": "custom",
            "parkSpeedXY": 80,
            "parkSpeedZ": 8
        }))
        .unwrap();
        assert_eq!(config.profile_scope, ProfileScope::Select);
        assert!(config.selected_profile_ids.contains("ender3"));
        assert_eq!(config.park_location, ParkLocation::MaxMax);
        assert_eq!(config.custom_park_x, 12.5);
        assert_eq!(config.custom_park_y, 7.0);
        assert_eq!(config.lift_z, 2.0);
        assert_eq!(config.speed_policy, SpeedPolicy::Custom);
        assert_eq!(config.custom_speed_xy, 80.0);
        assert_eq!(config.custom_speed_z, 8.0);
    }

    #[test]
    fn test_park_location_names() {
        for (name, expected) in [
            ("center", ParkLocation::Center),
            ("min", ParkLocation::MinMin),
            ("min_min", ParkLocation::MinMin),
            ("min_max", ParkLocation::MinMax),
            ("max_min", ParkLocation::MaxMin),
            ("max", ParkLocation::MaxMax),
            ("max_max", ParkLocation::MaxMax),
            ("custom", ParkLocation::Custom),
        ] {
            let config = ParkConfig::from_json(json!({ "parkLocation": name })).unwrap();
            assert_eq!(config.park_location, expected, "{}", name);
        }
    }

    #[test]
    fn test_unknown_park_location_is_rejected() {
        let result = ParkConfig::from_json(json!({ "parkLocation": "front_left" }));
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut config = ParkConfig::default();
        config.lift_z = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ParkConfig::default();
        config.custom_speed_z = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ParkConfig::default();
        config.custom_park_x = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_config_success() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("park.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "[park]\nparkLocation = 'min_max'\nliftZ = 12.0").unwrap();
        file.flush().unwrap();
        let config = load_config(&file_path).unwrap();
        assert_eq!(config.park.park_location, ParkLocation::MinMax);
        assert_eq!(config.park.lift_z, 12.0);
        // Defaults for missing fields
        assert_eq!(config.park.custom_speed_xy, 100.0);
        assert!(config.profile.is_none());
        assert_eq!(config.runtime.channel_capacity, 16);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent_file.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "not a valid toml").unwrap();
        file.flush().unwrap();
        let result = load_config(&file_path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("negative.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "[park]\nliftZ = -3.0").unwrap();
        file.flush().unwrap();
        let result = load_config(&file_path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
