use std::io;

/// Failure while extracting a value from a reply frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The frame does not contain the `encoder ` label.
    #[error("label not found in reply")]
    LabelNotFound,
    /// The label was found but the text after it is not a number.
    #[error("invalid number {text:?}")]
    InvalidNumber {
        /// The text that failed to parse, untrimmed.
        text: String,
    },
}

/// The error type for every controller exchange.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading from or writing to the byte stream failed.
    #[error("transport failure: {0}")]
    Transport(#[from] io::Error),

    /// No byte arrived before the overall timeout elapsed.
    #[error("no response from controller")]
    Timeout,

    /// A frame was received but it does not carry a usable position.
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] ParseError),

    /// Link settings could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true when the exchange failed because the device stayed silent.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Timeout.to_string(), "no response from controller");
        assert_eq!(
            Error::from(ParseError::LabelNotFound).to_string(),
            "invalid response: label not found in reply"
        );
        let e = Error::from(ParseError::InvalidNumber { text: "abc".into() });
        assert_eq!(e.to_string(), "invalid response: invalid number \"abc\"");
    }

    #[test]
    fn test_io_error_is_transport() {
        let e = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
        assert!(matches!(e, Error::Transport(_)));
        assert!(!e.is_timeout());
    }
}
