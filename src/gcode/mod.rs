// src/gcode/mod.rs - Motion directives emitted by the park controller
use std::fmt;

/// An axis travel speed.
///
/// Stored in mm/min because that is what the `F` word of a G-code move
/// expects. Settings express custom speeds in mm/s, printer profiles express
/// axis limits in mm/min; the constructors keep the two apart.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FeedRate(f64);

impl FeedRate {
    pub fn from_mm_per_min(value: f64) -> Self {
        Self(value)
    }

    pub fn from_mm_per_sec(value: f64) -> Self {
        Self(value * 60.0)
    }

    pub fn mm_per_min(self) -> f64 {
        self.0
    }

    pub fn mm_per_sec(self) -> f64 {
        self.0 / 60.0
    }

    pub fn min(self, other: FeedRate) -> FeedRate {
        if other.0 < self.0 { other } else { self }
    }
}

impl fmt::Display for FeedRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm/min", format_number(self.0))
    }
}

/// A single motion directive sent to the printer.
#[derive(Debug, Clone, PartialEq)]
pub enum GCodeCommand {
    /// `G90`
    AbsolutePositioning,
    /// `G91`
    RelativePositioning,
    /// `G1` with any subset of X/Y/Z and a feed rate.
    LinearMove {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        feed: FeedRate,
    },
    /// `G28`, restricted to the listed axes.
    Home { x: bool, y: bool, z: bool },
    /// `M400`: block until queued moves have finished.
    WaitForMoves,
}

impl GCodeCommand {
    pub fn move_xy(x: f64, y: f64, feed: FeedRate) -> Self {
        Self::LinearMove { x: Some(x), y: Some(y), z: None, feed }
    }

    pub fn move_z(z: f64, feed: FeedRate) -> Self {
        Self::LinearMove { x: None, y: None, z: Some(z), feed }
    }

    pub fn home_xy() -> Self {
        Self::Home { x: true, y: true, z: false }
    }
}

impl fmt::Display for GCodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbsolutePositioning => write!(f, "G90"),
            Self::RelativePositioning => write!(f, "G91"),
            Self::LinearMove { x, y, z, feed } => {
                write!(f, "G1")?;
                for (letter, value) in [('X', x), ('Y', y), ('Z', z)] {
                    if let Some(v) = value {
                        write!(f, " {}{}", letter, format_number(*v))?;
                    }
                }
                write!(f, " F{}", format_number(feed.mm_per_min()))
            }
            Self::Home { x, y, z } => {
                write!(f, "G28")?;
                for (letter, enabled) in [('X', x), ('Y', y), ('Z', z)] {
                    if *enabled {
                        write!(f, " {}", letter)?;
                    }
                }
                Ok(())
            }
            Self::WaitForMoves => write!(f, "M400"),
        }
    }
}

/// Render a coordinate without trailing zeros (`100` rather than `100.000`).
fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    let text = format!("{:.3}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_rate_units() {
        let feed = FeedRate::from_mm_per_sec(100.0);
        assert_eq!(feed.mm_per_min(), 6000.0);
        assert_eq!(feed.mm_per_sec(), 100.0);
        assert_eq!(FeedRate::from_mm_per_min(1200.0).mm_per_sec(), 20.0);
    }

    #[test]
    fn test_feed_rate_min() {
        let a = FeedRate::from_mm_per_min(9000.0);
        let b = FeedRate::from_mm_per_min(6000.0);
        assert_eq!(a.min(b), b);
        assert_eq!(b.min(a), b);
    }

    #[test]
    fn test_render_moves() {
        let feed = FeedRate::from_mm_per_min(6000.0);
        assert_eq!(GCodeCommand::move_xy(100.0, 100.0, feed).to_string(), "G1 X100 Y100 F6000");
        assert_eq!(GCodeCommand::move_z(0.25, feed).to_string(), "G1 Z0.25 F6000");
        assert_eq!(GCodeCommand::move_xy(12.3456, -0.0, feed).to_string(), "G1 X12.346 Y0 F6000");
    }

    #[test]
    fn test_render_modal_commands() {
        assert_eq!(GCodeCommand::AbsolutePositioning.to_string(), "G90");
        assert_eq!(GCodeCommand::RelativePositioning.to_string(), "G91");
        assert_eq!(GCodeCommand::home_xy().to_string(), "G28 X Y");
        assert_eq!(GCodeCommand::WaitForMoves.to_string(), "M400");
    }
}
