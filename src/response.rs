//! Extraction of labeled values from free-form reply text.
//!
//! The controller answers `readpos` with console chatter that contains a line
//! such as `encoder 182.25`. Only the text after the label is significant.

use core::fmt;
use core::str::FromStr;

use crate::errors::ParseError;

/// Label that precedes the position value in a `readpos` reply.
pub const POSITION_LABEL: &str = "encoder ";

/// Line break that ends a labeled value.
pub const LINE_BREAK: char = '\n';

/// A value located after a label in reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabeledField<'a> {
    /// Raw text between the label and the line break, untrimmed.
    pub value: &'a str,
    /// False when no line break followed and the value runs to end of frame.
    pub terminated: bool,
}

/// Finds the first occurrence of `label` and returns the text after it.
///
/// The value ends at the next [`LINE_BREAK`]. When the frame ends first, the
/// value runs to the end of the text; the framer only hands over a frame once
/// the device has gone quiet, so nothing more is coming for that line.
#[must_use]
pub fn find_labeled_field<'a>(text: &'a str, label: &str) -> Option<LabeledField<'a>> {
    let start = text.find(label)? + label.len();
    let rest = &text[start..];
    Some(match rest.find(LINE_BREAK) {
        Some(end) => LabeledField {
            value: &rest[..end],
            terminated: true,
        },
        None => LabeledField {
            value: rest,
            terminated: false,
        },
    })
}

/// Motor shaft position reported by the encoder, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionReply {
    /// Angle in degrees.
    pub degrees: f64,
}

impl fmt::Display for PositionReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.degrees)
    }
}

impl FromStr for PositionReply {
    type Err = ParseError;

    /// Parses a whole reply frame.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = find_labeled_field(s, POSITION_LABEL).ok_or(ParseError::LabelNotFound)?;
        let degrees = parse_number(field.value)?;
        Ok(Self { degrees })
    }
}

/// Parses a raw reply frame into a [`PositionReply`].
///
/// Bytes that are not valid UTF-8 are replaced before scanning.
///
/// # Errors
/// Returns `ParseError::LabelNotFound` if the frame has no `encoder ` label and
/// `ParseError::InvalidNumber` if the labeled text is not a finite number.
pub fn parse_position(frame: &[u8]) -> Result<PositionReply, ParseError> {
    String::from_utf8_lossy(frame).parse()
}

fn parse_number(text: &str) -> Result<f64, ParseError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::InvalidNumber {
            text: text.to_owned(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_find_labeled_field_terminated() {
        let field = find_labeled_field("readpos\r\nencoder 182.25\r\n:>", POSITION_LABEL).unwrap();
        assert_eq!(field.value, "182.25\r");
        assert!(field.terminated);
    }

    #[test]
    fn test_find_labeled_field_runs_to_end_of_frame() {
        let field = find_labeled_field("encoder 90.00", POSITION_LABEL).unwrap();
        assert_eq!(field.value, "90.00");
        assert!(!field.terminated);
    }

    #[test]
    fn test_find_labeled_field_is_case_sensitive() {
        assert!(find_labeled_field("Encoder 1.0\n", POSITION_LABEL).is_none());
        // the trailing space is part of the label
        assert!(find_labeled_field("encoder:1.0\n", POSITION_LABEL).is_none());
    }

    #[test]
    fn test_parse_position() {
        let reply = parse_position(b"encoder 182.25\n").unwrap();
        assert_eq!(reply.degrees, 182.25);
        assert_eq!(reply.to_string(), "182.25");
    }

    #[test]
    fn test_parse_position_with_chatter() {
        let reply = parse_position(b"readpos\r\n:>encoder -45.50\r\nangle ok\r\n").unwrap();
        assert_eq!(reply.degrees, -45.5);
    }

    #[test]
    fn test_parse_position_tolerates_whitespace() {
        let reply = parse_position(b"encoder    7.5  \r\n").unwrap();
        assert_eq!(reply.degrees, 7.5);
    }

    #[test]
    fn test_parse_position_uses_first_label() {
        let reply = parse_position(b"encoder 1.00\nencoder 2.00\n").unwrap();
        assert_eq!(reply.degrees, 1.0);
    }

    #[test]
    fn test_parse_position_label_not_found() {
        assert_eq!(parse_position(b"garbage\n"), Err(ParseError::LabelNotFound));
        assert_eq!(parse_position(b""), Err(ParseError::LabelNotFound));
    }

    #[test]
    fn test_parse_position_invalid_number() {
        assert_eq!(
            parse_position(b"encoder 12,5\n"),
            Err(ParseError::InvalidNumber {
                text: "12,5".into()
            })
        );
        assert_eq!(
            parse_position(b"encoder \n"),
            Err(ParseError::InvalidNumber { text: "".into() })
        );
        assert!(matches!(
            parse_position(b"encoder NaN\n"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_position_unterminated_trailing_garbage_is_rejected() {
        assert!(matches!(
            parse_position(b"encoder 90.00:>"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_position_non_utf8() {
        let reply = parse_position(&[0xFF, b'e', b'n', b'c', b'o', b'd', b'e', b'r', b' ', b'3', b'\n'])
            .unwrap();
        assert_eq!(reply.degrees, 3.0);
    }
}
