use core::fmt;

/// Closed-loop control mode of the controller.
///
/// The wire representation is the discriminant, not the name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControlMode {
    /// Motor output disabled.
    Off = 0,
    /// Open-loop stepping, encoder ignored.
    OpenLoop = 1,
    /// Simple position PID.
    #[default]
    SimplePid = 2,
    /// Current-based PID.
    CurrentPid = 3,
    /// Velocity PID.
    VelocityPid = 4,
}

/// Error returned when a byte does not name a control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidControlMode(pub u8);

impl TryFrom<u8> for ControlMode {
    type Error = InvalidControlMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::OpenLoop),
            2 => Ok(Self::SimplePid),
            3 => Ok(Self::CurrentPid),
            4 => Ok(Self::VelocityPid),
            other => Err(InvalidControlMode(other)),
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_mode_values() {
        assert_eq!(ControlMode::Off as u8, 0);
        assert_eq!(ControlMode::OpenLoop as u8, 1);
        assert_eq!(ControlMode::SimplePid as u8, 2);
        assert_eq!(ControlMode::CurrentPid as u8, 3);
        assert_eq!(ControlMode::VelocityPid as u8, 4);
    }

    #[test]
    fn test_control_mode_default_is_simple_pid() {
        assert_eq!(ControlMode::default(), ControlMode::SimplePid);
    }

    #[test]
    fn test_control_mode_try_from() {
        assert_eq!(ControlMode::try_from(3), Ok(ControlMode::CurrentPid));
        assert_eq!(ControlMode::try_from(5), Err(InvalidControlMode(5)));
    }

    #[test]
    fn test_control_mode_display_is_numeric() {
        assert_eq!(ControlMode::VelocityPid.to_string(), "4");
    }
}
