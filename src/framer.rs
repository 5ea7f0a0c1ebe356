//! Reply framing for the controller's unterminated text responses.
//!
//! Replies carry no length prefix and no reliable terminator. A frame is
//! therefore delimited by silence: once the first byte has arrived, the frame
//! is complete when no further byte follows within the idle timeout. If no
//! byte arrives at all within the overall timeout, the exchange has failed.
//!
//! [`ResponseFramer::poll`] never blocks, so the framer can be driven from an
//! external event loop as well as from [`Controller::read_position`].
//!
//! [`Controller::read_position`]: crate::Controller::read_position

use std::io;
use std::mem;
use std::time::Duration;

use crate::clock::Clock;
use crate::errors::ParseError;
use crate::response::{PositionReply, parse_position};
use crate::transport::Transport;

/// Maximum gap between reply bytes before the frame is considered complete.
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(25);

/// Maximum wait for the first reply byte.
pub const OVERALL_TIMEOUT: Duration = Duration::from_millis(500);

/// The two thresholds that terminate an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Character-interval timeout, armed once the first byte arrives.
    pub idle: Duration,
    /// No-response timeout, armed when the request is sent.
    pub overall: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            idle: IDLE_TIMEOUT,
            overall: OVERALL_TIMEOUT,
        }
    }
}

/// Bytes captured between the first reply byte and the idle cutoff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFrame(Vec<u8>);

impl RawFrame {
    /// Returns the captured bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of captured bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no byte was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the frame and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Consumes the frame and extracts the encoder position from it.
    ///
    /// # Errors
    /// See [`parse_position`].
    pub fn into_position(self) -> Result<PositionReply, ParseError> {
        parse_position(&self.0)
    }
}

impl From<Vec<u8>> for RawFrame {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Where an exchange stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerState {
    /// No exchange in progress.
    Idle,
    /// Request sent, nothing received yet.
    AwaitingFirstByte {
        /// When the request was sent.
        since: Duration,
    },
    /// At least one byte received.
    ReceivingFrame {
        /// When the most recent byte arrived.
        last_byte_at: Duration,
    },
    /// The idle timeout closed the frame.
    Completed,
    /// The overall timeout elapsed without a single byte.
    Failed,
}

impl FramerState {
    /// Returns true once the exchange has resolved either way.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Outcome of one [`ResponseFramer::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    /// Keep polling.
    Pending,
    /// The frame is complete. Reported once per exchange.
    Complete(RawFrame),
    /// No reply within the overall timeout. Reported once per exchange.
    Failed,
    /// The framer is idle or has already reported its outcome.
    Inactive,
}

/// Silence-delimited frame assembler.
#[derive(Debug, Clone)]
pub struct ResponseFramer {
    timeouts: Timeouts,
    state: FramerState,
    frame: Vec<u8>,
}

impl Default for ResponseFramer {
    fn default() -> Self {
        Self::new(Timeouts::default())
    }
}

impl ResponseFramer {
    /// Creates an idle framer.
    #[must_use]
    pub const fn new(timeouts: Timeouts) -> Self {
        Self {
            timeouts,
            state: FramerState::Idle,
            frame: Vec::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> FramerState {
        self.state
    }

    /// Thresholds in use.
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Reads and discards every byte already waiting on the transport.
    ///
    /// Returns the number of bytes discarded.
    ///
    /// # Errors
    /// Returns the transport's I/O error.
    pub fn drain<T: Transport + ?Sized>(transport: &mut T) -> io::Result<usize> {
        let mut discarded = 0;
        while transport.is_byte_available()? {
            transport.read_byte()?;
            discarded += 1;
        }
        Ok(discarded)
    }

    /// Begins an exchange. Call right after the request line was written.
    pub fn start<C: Clock + ?Sized>(&mut self, clock: &C) {
        self.frame.clear();
        self.state = FramerState::AwaitingFirstByte { since: clock.now() };
    }

    /// Consumes every available byte, then checks both timeouts.
    ///
    /// # Errors
    /// Returns the transport's I/O error. The exchange stays open so the caller
    /// decides whether to abandon it.
    pub fn poll<T, C>(&mut self, transport: &mut T, clock: &C) -> io::Result<FrameStatus>
    where
        T: Transport + ?Sized,
        C: Clock + ?Sized,
    {
        if matches!(self.state, FramerState::Idle) || self.state.is_terminal() {
            return Ok(FrameStatus::Inactive);
        }

        while transport.is_byte_available()? {
            let byte = transport.read_byte()?;
            self.frame.push(byte);
            self.state = FramerState::ReceivingFrame {
                last_byte_at: clock.now(),
            };
        }

        let now = clock.now();
        match self.state {
            FramerState::ReceivingFrame { last_byte_at }
                if now.saturating_sub(last_byte_at) > self.timeouts.idle =>
            {
                self.state = FramerState::Completed;
                let frame = RawFrame(mem::take(&mut self.frame));
                tracing::trace!(len = frame.len(), "reply frame complete");
                Ok(FrameStatus::Complete(frame))
            }
            FramerState::AwaitingFirstByte { since }
                if now.saturating_sub(since) > self.timeouts.overall =>
            {
                self.state = FramerState::Failed;
                self.frame.clear();
                Ok(FrameStatus::Failed)
            }
            _ => Ok(FrameStatus::Pending),
        }
    }
}
