//! Print-state events delivered by the host, validated at ingestion.

use serde_json::Value;
use thiserror::Error;

use crate::park::pause_state::Position;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventError {
    #[error("{event} payload has no position object")]
    MissingPosition { event: String },
    #[error("{event} position is missing axis {axis}")]
    MissingAxis { event: String, axis: char },
    #[error("{event} position axis {axis} is not a finite number: {value}")]
    InvalidAxis { event: String, axis: char, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrintEvent {
    /// The print was paused with the toolhead at `position`.
    Paused(Position),
    Resumed,
    /// Any other host event. Passed through untouched.
    Other(String),
}

impl PrintEvent {
    /// Build an event from a host event name and its JSON payload.
    ///
    /// Pause payloads look like `{"position": {"x": 10, "y": 20, "z": 5, ...}}`;
    /// extra fields are ignored, but all three axes must be present.
    pub fn from_host(name: &str, payload: &Value) -> Result<Self, EventError> {
        match name {
            "PrintPaused" | "PAUSED" => {
                let position = payload
                    .get("position")
                    .filter(|p| p.is_object())
                    .ok_or_else(|| EventError::MissingPosition { event: name.to_string() })?;
                Ok(PrintEvent::Paused(Position {
                    x: axis(name, position, 'x')?,
                    y: axis(name, position, 'y')?,
                    z: axis(name, position, 'z')?,
                }))
            }
            "PrintResumed" | "RESUMED" => Ok(PrintEvent::Resumed),
            other => Ok(PrintEvent::Other(other.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PrintEvent::Paused(_) => "PAUSED",
            PrintEvent::Resumed => "RESUMED",
            PrintEvent::Other(name) => name,
        }
    }
}

fn axis(event: &str, position: &Value, axis: char) -> Result<f64, EventError> {
    let key = axis.to_string();
    match position.get(&key) {
        None | Some(Value::Null) => Err(EventError::MissingAxis { event: event.to_string(), axis }),
        Some(value) => value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| EventError::InvalidAxis {
                event: event.to_string(),
                axis,
                value: value.to_string(),
            }),
    }
}
