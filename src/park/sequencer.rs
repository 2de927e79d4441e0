//! Ordered directive sequences for parking and unparking.
//!
//! Park lifts Z before any horizontal travel; unpark restores XY before
//! lowering Z. Both end with a wait so the moves have physically finished
//! before the host carries on.

use crate::gcode::GCodeCommand;
use crate::park::pause_state::Position;
use crate::park::resolver::{ParkSpeeds, ParkTarget};

pub fn park_sequence(target: ParkTarget, lift_z: f64, speeds: ParkSpeeds) -> Vec<GCodeCommand> {
    vec![
        GCodeCommand::RelativePositioning,
        GCodeCommand::move_z(lift_z, speeds.z),
        GCodeCommand::AbsolutePositioning,
        GCodeCommand::move_xy(target.x, target.y, speeds.xy),
        GCodeCommand::WaitForMoves,
    ]
}

pub fn unpark_sequence(saved: Position, speeds: ParkSpeeds, home_first: bool) -> Vec<GCodeCommand> {
    let mut commands = Vec::with_capacity(5);
    if home_first {
        commands.push(GCodeCommand::home_xy());
    }
    commands.extend([
        GCodeCommand::AbsolutePositioning,
        GCodeCommand::move_xy(saved.x, saved.y, speeds.xy),
        GCodeCommand::move_z(saved.z, speeds.z),
        GCodeCommand::WaitForMoves,
    ]);
    commands
}

pub fn render(commands: &[GCodeCommand]) -> Vec<String> {
    commands.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcode::FeedRate;

    fn speeds() -> ParkSpeeds {
        ParkSpeeds {
            xy: FeedRate::from_mm_per_min(6000.0),
            z: FeedRate::from_mm_per_min(600.0),
        }
    }

    #[test]
    fn test_park_lifts_before_moving() {
        let commands = park_sequence(ParkTarget { x: 100.0, y: 100.0 }, 5.0, speeds());
        assert_eq!(
            render(&commands),
            vec!["G91", "G1 Z5 F600", "G90", "G1 X100 Y100 F6000", "M400"]
        );
    }

    #[test]
    fn test_unpark_restores_xy_before_z() {
        let commands = unpark_sequence(Position::new(10.0, 20.0, 5.0), speeds(), false);
        assert_eq!(
            render(&commands),
            vec!["G90", "G1 X10 Y20 F6000", "G1 Z5 F600", "M400"]
        );
    }

    #[test]
    fn test_unpark_with_homing() {
        let commands = unpark_sequence(Position::new(5.0, 5.0, 2.0), speeds(), true);
        assert_eq!(commands.first(), Some(&GCodeCommand::home_xy()));
        assert_eq!(
            render(&commands),
            vec!["G28 X Y", "G90", "G1 X5 Y5 F6000", "G1 Z2 F600", "M400"]
        );
    }
}
