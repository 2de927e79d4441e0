// src/park/pause_state.rs - Position saved while the toolhead is parked
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A toolhead position in mm.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParkError {
    #[error("stored pause position is incomplete: x={x:?} y={y:?} z={z:?}")]
    CorruptState {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    },
}

/// What a [`PauseState`] holds once checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SavedPosition {
    /// Nothing saved: no pause was parked.
    Idle,
    Parked(Position),
}

/// The saved pause position. All three axes are set or none is.
///
/// Fields are private so the all-or-nothing rule can only be broken through
/// [`PauseState::from_parts`], which exists for restoring externally held
/// state; [`PauseState::saved`] detects the breakage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PauseState {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
}

impl PauseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        Self { x, y, z }
    }

    /// Record a pause position, replacing any earlier one.
    pub fn save(&mut self, position: Position) {
        self.x = Some(position.x);
        self.y = Some(position.y);
        self.z = Some(position.z);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }

    pub fn parts(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (self.x, self.y, self.z)
    }

    pub fn saved(&self) -> Result<SavedPosition, ParkError> {
        match (self.x, self.y, self.z) {
            (Some(x), Some(y), Some(z)) => Ok(SavedPosition::Parked(Position { x, y, z })),
            (None, None, None) => Ok(SavedPosition::Idle),
            (x, y, z) => Err(ParkError::CorruptState { x, y, z }),
        }
    }
}
