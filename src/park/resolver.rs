//! Resolution of park coordinates, feed rates and the profile gate.
//!
//! Nothing here is cached: the profile is read at the moment a value is
//! needed because the host may switch profiles between pause and resume.

use thiserror::Error;

use crate::config::{ParkConfig, ParkLocation, ProfileScope, SpeedPolicy};
use crate::gcode::FeedRate;
use crate::profile::PrinterProfile;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("{0} requires a printer profile but none is available")]
    MissingProfile(&'static str),
    #[error("printer profile is unusable: {0}")]
    InvalidProfile(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkTarget {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkSpeeds {
    pub xy: FeedRate,
    pub z: FeedRate,
}

pub fn resolve_park_target(
    config: &ParkConfig,
    profile: Option<&PrinterProfile>,
) -> Result<ParkTarget, ResolveError> {
    let location = config.park_location;
    if location == ParkLocation::Custom {
        return Ok(ParkTarget { x: config.custom_park_x, y: config.custom_park_y });
    }
    let profile = profile.ok_or(ResolveError::MissingProfile("park location"))?;
    let (width, depth) = (profile.volume.width, profile.volume.depth);
    if !(width.is_finite() && depth.is_finite()) || width <= 0.0 || depth <= 0.0 {
        return Err(ResolveError::InvalidProfile(format!("build volume {}x{}", width, depth)));
    }
    let (x, y) = match location {
        ParkLocation::Center => (width / 2.0, depth / 2.0),
        ParkLocation::MinMin => (0.0, 0.0),
        ParkLocation::MinMax => (0.0, depth),
        ParkLocation::MaxMin => (width, 0.0),
        ParkLocation::MaxMax => (width, depth),
        ParkLocation::Custom => (config.custom_park_x, config.custom_park_y),
    };
    Ok(ParkTarget { x, y })
}

pub fn resolve_speeds(
    config: &ParkConfig,
    profile: Option<&PrinterProfile>,
) -> Result<ParkSpeeds, ResolveError> {
    match config.speed_policy {
        SpeedPolicy::Custom => Ok(custom_speeds(config)),
        SpeedPolicy::Auto => {
            let profile = profile.ok_or(ResolveError::MissingProfile("automatic park speed"))?;
            let xy = profile.max_feed_x().min(profile.max_feed_y());
            let z = profile.max_feed_z();
            for feed in [xy, z] {
                let value = feed.mm_per_min();
                if !value.is_finite() || value <= 0.0 {
                    return Err(ResolveError::InvalidProfile(format!("axis speed {}", value)));
                }
            }
            Ok(ParkSpeeds { xy, z })
        }
    }
}

pub(crate) fn custom_speeds(config: &ParkConfig) -> ParkSpeeds {
    ParkSpeeds {
        xy: FeedRate::from_mm_per_sec(config.custom_speed_xy),
        z: FeedRate::from_mm_per_sec(config.custom_speed_z),
    }
}

pub fn is_enabled_for_profile(config: &ParkConfig, profile: Option<&PrinterProfile>) -> bool {
    match config.profile_scope {
        ProfileScope::All => true,
        ProfileScope::Select => profile
            .and_then(PrinterProfile::profile_id)
            .is_some_and(|id| config.selected_profile_ids.contains(id)),
    }
}

/// Park target with the `(0, 0)` fallback. Parking is best-effort.
pub(crate) fn park_target_or_origin(config: &ParkConfig, profile: Option<&PrinterProfile>) -> ParkTarget {
    resolve_park_target(config, profile).unwrap_or_else(|e| {
        tracing::error!("Invalid park location {:?}: {}; parking at origin", config.park_location, e);
        ParkTarget { x: 0.0, y: 0.0 }
    })
}

/// Speeds with the configured custom speeds as fallback.
pub(crate) fn speeds_or_custom(config: &ParkConfig, profile: Option<&PrinterProfile>) -> ParkSpeeds {
    resolve_speeds(config, profile).unwrap_or_else(|e| {
        tracing::error!("Cannot derive park speeds: {}; using configured custom speeds", e);
        custom_speeds(config)
    })
}
