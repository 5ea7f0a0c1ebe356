//! Command lines understood by the controller's serial console.
//!
//! Each [`Command`] renders to exactly one ASCII line: a keyword followed by
//! space-separated decimal arguments. The line terminator is appended by the
//! [`Transport`](crate::Transport), not here. Values are not range-checked;
//! the firmware owns that.

use core::fmt;

use crate::direction::Direction;
use crate::enums::ControlMode;

mod cmd {
    pub const CTRL_MODE: &str = "ctrlmode";
    pub const MAX_CURRENT: &str = "maxcurrent";
    pub const HOLD_CURRENT: &str = "holdcurrent";
    pub const STEPS_PER_ROTATION: &str = "stepsperrotation";
    pub const MOVE: &str = "move";
    pub const STEP: &str = "step";
    pub const MICROSTEPS: &str = "microsteps";
    pub const STOP: &str = "stop";
    pub const SET_POS: &str = "setpos";
    pub const SET_ZERO: &str = "setzero";
    pub const ENABLE_PIN_MODE: &str = "enablepinmode";
    pub const CALIBRATE: &str = "calibrate";
    pub const READ_POS: &str = "readpos";
}

/// A single request to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Select the closed-loop control mode.
    SetControlMode(ControlMode),
    /// Set the maximum run current.
    SetMaxCurrent(u32),
    /// Set the holding current.
    SetHoldCurrent(u32),
    /// Set the number of full steps per motor rotation.
    SetStepsPerRotation(u32),
    /// Move to an absolute angle in degrees at the given speed.
    MoveToAngle {
        /// Target angle in degrees.
        angle: f64,
        /// Speed in the firmware's units.
        speed: i32,
    },
    /// Move a relative number of steps.
    MoveSteps {
        /// Rotation direction.
        direction: Direction,
        /// Number of steps.
        count: i32,
    },
    /// Set the microstepping divisor.
    SetMicrostep(u8),
    /// Stop any move in progress.
    Stop,
    /// Redefine the current position, in degrees.
    SetPosition(f64),
    /// Redefine the current position as zero.
    SetZero,
    /// Hand motor enable over to the EN pin.
    EnablePinMode(bool),
    /// Run the encoder calibration routine.
    Calibrate,
    /// Ask for the current encoder position.
    ReadPosition,
}

impl Command {
    /// Renders the command line without a terminator.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Returns the leading keyword of the command line.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::SetControlMode(_) => cmd::CTRL_MODE,
            Self::SetMaxCurrent(_) => cmd::MAX_CURRENT,
            Self::SetHoldCurrent(_) => cmd::HOLD_CURRENT,
            Self::SetStepsPerRotation(_) => cmd::STEPS_PER_ROTATION,
            Self::MoveToAngle { .. } => cmd::MOVE,
            Self::MoveSteps { .. } => cmd::STEP,
            Self::SetMicrostep(_) => cmd::MICROSTEPS,
            Self::Stop => cmd::STOP,
            Self::SetPosition(_) => cmd::SET_POS,
            Self::SetZero => cmd::SET_ZERO,
            Self::EnablePinMode(_) => cmd::ENABLE_PIN_MODE,
            Self::Calibrate => cmd::CALIBRATE,
            Self::ReadPosition => cmd::READ_POS,
        }
    }

    /// Returns true for commands the controller answers with a frame.
    #[must_use]
    pub const fn expects_reply(&self) -> bool {
        matches!(self, Self::ReadPosition)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.keyword();
        match *self {
            Self::SetControlMode(mode) => write!(f, "{keyword} {mode}"),
            Self::SetMaxCurrent(value)
            | Self::SetHoldCurrent(value)
            | Self::SetStepsPerRotation(value) => write!(f, "{keyword} {value}"),
            Self::MoveToAngle { angle, speed } => write!(f, "{keyword} {angle:.2} {speed}"),
            Self::MoveSteps { direction, count } => write!(f, "{keyword} {direction} {count}"),
            Self::SetMicrostep(steps) => write!(f, "{keyword} {steps}"),
            Self::SetPosition(position) => write!(f, "{keyword} {position:.2}"),
            // The firmware takes 0 to enable pin mode and 1 to disable it.
            Self::EnablePinMode(enable) => write!(f, "{keyword} {}", u8::from(!enable)),
            Self::Stop | Self::SetZero | Self::Calibrate | Self::ReadPosition => {
                f.write_str(keyword)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_commands() {
        assert_eq!(
            Command::SetControlMode(ControlMode::SimplePid).encode(),
            "ctrlmode 2"
        );
        assert_eq!(Command::SetControlMode(ControlMode::Off).encode(), "ctrlmode 0");
        assert_eq!(Command::SetMaxCurrent(2000).encode(), "maxcurrent 2000");
        assert_eq!(Command::SetHoldCurrent(0).encode(), "holdcurrent 0");
        assert_eq!(
            Command::SetStepsPerRotation(200).encode(),
            "stepsperrotation 200"
        );
        assert_eq!(Command::SetMicrostep(16).encode(), "microsteps 16");
    }

    #[test]
    fn test_move_to_angle_two_decimals() {
        let line = |angle, speed| Command::MoveToAngle { angle, speed }.encode();
        assert_eq!(line(0.0, 30), "move 0.00 30");
        assert_eq!(line(182.25, 0), "move 182.25 0");
        assert_eq!(line(-45.5, -10), "move -45.50 -10");
        assert_eq!(line(10.0, 30), "move 10.00 30");
    }

    #[test]
    fn test_move_steps() {
        let cmd = Command::MoveSteps {
            direction: Direction::Reverse,
            count: 400,
        };
        assert_eq!(cmd.encode(), "step 1 400");
        let cmd = Command::MoveSteps {
            direction: Direction::Forward,
            count: 0,
        };
        assert_eq!(cmd.encode(), "step 0 0");
    }

    #[test]
    fn test_set_position() {
        assert_eq!(Command::SetPosition(90.0).encode(), "setpos 90.00");
        assert_eq!(Command::SetPosition(-0.126).encode(), "setpos -0.13");
    }

    #[test]
    fn test_enable_pin_mode_is_inverted() {
        assert_eq!(Command::EnablePinMode(true).encode(), "enablepinmode 0");
        assert_eq!(Command::EnablePinMode(false).encode(), "enablepinmode 1");
    }

    #[test]
    fn test_bare_keywords() {
        assert_eq!(Command::Stop.encode(), "stop");
        assert_eq!(Command::SetZero.encode(), "setzero");
        assert_eq!(Command::Calibrate.encode(), "calibrate");
        assert_eq!(Command::ReadPosition.encode(), "readpos");
    }

    #[test]
    fn test_only_read_position_expects_reply() {
        assert!(Command::ReadPosition.expects_reply());
        assert!(!Command::Stop.expects_reply());
        assert!(!Command::SetZero.expects_reply());
    }
}
