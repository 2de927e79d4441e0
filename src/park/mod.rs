// src/park/mod.rs - Park the toolhead on pause, restore it on resume
pub mod controller;
pub mod pause_state;
pub mod resolver;
pub mod sequencer;

pub use controller::{EventOutcome, ParkController};
pub use pause_state::{ParkError, PauseState, Position, SavedPosition};
pub use resolver::{
    is_enabled_for_profile, resolve_park_target, resolve_speeds, ParkSpeeds, ParkTarget, ResolveError,
};
