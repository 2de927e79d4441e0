// src/profile.rs - Printer profile snapshot supplied by the host
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::gcode::FeedRate;

/// Read-only snapshot of the active printer profile.
///
/// Mirrors the host's profile layout: build volume in mm, per-axis maximum
/// speeds in mm/min.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PrinterProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub volume: BuildVolume,
    #[serde(default)]
    pub axes: AxesProfile,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BuildVolume {
    #[serde(default = "default_extent")]
    pub width: f64,
    #[serde(default = "default_extent")]
    pub depth: f64,
    #[serde(default = "default_extent")]
    pub height: f64,
}

impl Default for BuildVolume {
    fn default() -> Self {
        Self {
            width: default_extent(),
            depth: default_extent(),
            height: default_extent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AxisProfile {
    /// Maximum feed rate in mm/min.
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AxesProfile {
    #[serde(default = "default_xy_axis")]
    pub x: AxisProfile,
    #[serde(default = "default_xy_axis")]
    pub y: AxisProfile,
    #[serde(default = "default_z_axis")]
    pub z: AxisProfile,
}

impl Default for AxesProfile {
    fn default() -> Self {
        Self {
            x: default_xy_axis(),
            y: default_xy_axis(),
            z: default_z_axis(),
        }
    }
}

// Host defaults for a generic printer
fn default_extent() -> f64 { 200.0 }
fn default_xy_axis() -> AxisProfile { AxisProfile { speed: 6000.0 } }
fn default_z_axis() -> AxisProfile { AxisProfile { speed: 200.0 } }

impl PrinterProfile {
    pub fn new(id: impl Into<String>, width: f64, depth: f64) -> Self {
        Self {
            id: Some(id.into()),
            volume: BuildVolume { width, depth, ..BuildVolume::default() },
            ..Self::default()
        }
    }

    pub fn with_max_feeds(mut self, x: f64, y: f64, z: f64) -> Self {
        self.axes = AxesProfile {
            x: AxisProfile { speed: x },
            y: AxisProfile { speed: y },
            z: AxisProfile { speed: z },
        };
        self
    }

    /// Profile id, treating an empty string the same as no id.
    pub fn profile_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn max_feed_x(&self) -> FeedRate {
        FeedRate::from_mm_per_min(self.axes.x.speed)
    }

    pub fn max_feed_y(&self) -> FeedRate {
        FeedRate::from_mm_per_min(self.axes.y.speed)
    }

    pub fn max_feed_z(&self) -> FeedRate {
        FeedRate::from_mm_per_min(self.axes.z.speed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let volume = &self.volume;
        for (key, value) in [("width", volume.width), ("depth", volume.depth), ("height", volume.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("profile volume {} must be > 0", key)));
            }
        }
        for (axis, speed) in [("x", self.axes.x.speed), ("y", self.axes.y.speed), ("z", self.axes.z.speed)] {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(ConfigError::Invalid(format!("profile {} axis speed must be > 0", axis)));
            }
        }
        Ok(())
    }
}

/// Where the controller asks for the current printer profile.
///
/// Queried on every event; profiles can change between a pause and a resume.
pub trait ProfileSource {
    fn current_profile(&self) -> Option<PrinterProfile>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_id_filters_empty() {
        let mut profile = PrinterProfile::new("", 200.0, 200.0);
        assert_eq!(profile.profile_id(), None);
        profile.id = None;
        assert_eq!(profile.profile_id(), None);
        profile.id = Some("voron".to_string());
        assert_eq!(profile.profile_id(), Some("voron"));
    }

    #[test]
    fn test_parse_host_profile_shape() {
        let profile: PrinterProfile = serde_json::from_value(serde_json::json!({
            "id": "_default",
            "name": "Default",
            "volume": { "width": 220, "depth": 220, "height": 250, "formFactor": "rectangular" },
            "axes": {
                "x": { "speed": 6000, "inverted": false },
                "y": { "speed": 6000, "inverted": false },
                "z": { "speed": 200, "inverted": false },
                "e": { "speed": 300, "inverted": false }
            }
        }))
        .unwrap();
        assert_eq!(profile.volume.width, 220.0);
        assert_eq!(profile.max_feed_z().mm_per_min(), 200.0);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_volume() {
        let profile = PrinterProfile::new("flat", 0.0, 200.0);
        assert!(matches!(profile.validate(), Err(ConfigError::Invalid(_))));
    }
}
