use core::fmt;

/// Rotation direction for relative step moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    /// Forward rotation.
    Forward = 0,
    /// Reverse rotation.
    Reverse = 1,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_values() {
        assert_eq!(Direction::Forward as u8, 0);
        assert_eq!(Direction::Reverse as u8, 1);
        assert_eq!(Direction::Reverse.to_string(), "1");
    }
}
