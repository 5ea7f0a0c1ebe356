//! Simulated clock and transport for deterministic tests.
//!
//! [`ScriptedTransport`] releases bytes at scheduled instants of a shared
//! [`SimClock`]. Sleeping on the clock advances simulated time, so a blocking
//! [`Controller::read_position`](crate::Controller::read_position) runs
//! instantly and reproducibly.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use nzs_servo_rs::sim::{ScriptedTransport, SimClock};
//! use nzs_servo_rs::{Controller, ControllerConfig};
//!
//! let clock = SimClock::new();
//! let mut transport = ScriptedTransport::new(clock.clone());
//! transport.reply_to("readpos", Duration::from_millis(5), Duration::from_millis(1), b"encoder 182.25\r\n");
//!
//! let mut controller = Controller::with_clock(transport, clock, ControllerConfig::default());
//! assert_eq!(controller.read_position().unwrap().degrees, 182.25);
//! ```

use std::cell::Cell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::clock::Clock;
use crate::transport::Transport;

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now: Rc<Cell<Duration>>,
}

impl SimClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jumps to `now`.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Bytes the device sends back once a given line is written.
#[derive(Debug, Clone)]
struct ScriptedReply {
    trigger: String,
    delay: Duration,
    gap: Duration,
    bytes: Vec<u8>,
}

/// A [`Transport`] replaying scheduled bytes against a [`SimClock`].
#[derive(Debug)]
pub struct ScriptedTransport {
    clock: SimClock,
    /// Bytes ordered by release time.
    incoming: VecDeque<(Duration, u8)>,
    replies: VecDeque<ScriptedReply>,
    written: Vec<String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl ScriptedTransport {
    /// Creates a silent transport.
    #[must_use]
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            incoming: VecDeque::new(),
            replies: VecDeque::new(),
            written: Vec::new(),
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Makes all of `bytes` readable from time `at`.
    pub fn push_bytes_at(&mut self, at: Duration, bytes: &[u8]) {
        self.push_bytes_spaced(at, Duration::ZERO, bytes);
    }

    /// Releases `bytes` one at a time, the first at `start` and each next
    /// one `gap` later.
    pub fn push_bytes_spaced(&mut self, start: Duration, gap: Duration, bytes: &[u8]) {
        let mut at = start;
        for &byte in bytes {
            let index = self.incoming.partition_point(|&(t, _)| t <= at);
            self.incoming.insert(index, (at, byte));
            at += gap;
        }
    }

    /// Schedules `bytes` when `trigger` is next written, starting `delay`
    /// after the write with `gap` between bytes.
    ///
    /// Replies are matched in the order they were registered.
    pub fn reply_to(&mut self, trigger: &str, delay: Duration, gap: Duration, bytes: &[u8]) {
        self.replies.push_back(ScriptedReply {
            trigger: trigger.to_owned(),
            delay,
            gap,
            bytes: bytes.to_vec(),
        });
    }

    /// Every line written so far, without terminators.
    #[must_use]
    pub fn written_lines(&self) -> &[String] {
        &self.written
    }

    /// Number of scheduled bytes not yet read, released or not.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.incoming.len()
    }

    /// Makes subsequent reads fail with `BrokenPipe`.
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Makes subsequent writes fail with `BrokenPipe`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn broken_pipe() -> io::Error {
        io::Error::new(io::ErrorKind::BrokenPipe, "simulated link failure")
    }
}

impl Transport for ScriptedTransport {
    fn is_byte_available(&mut self) -> io::Result<bool> {
        if self.fail_reads {
            return Err(Self::broken_pipe());
        }
        let now = self.clock.now();
        Ok(self.incoming.front().is_some_and(|&(at, _)| at <= now))
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        if !self.is_byte_available()? {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        self.incoming
            .pop_front()
            .map(|(_, byte)| byte)
            .ok_or_else(|| io::ErrorKind::WouldBlock.into())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(Self::broken_pipe());
        }
        self.written.push(line.to_owned());
        if self.replies.front().is_some_and(|reply| reply.trigger == line) {
            if let Some(reply) = self.replies.pop_front() {
                let start = self.clock.now() + reply.delay;
                self.push_bytes_spaced(start, reply.gap, &reply.bytes);
            }
        }
        Ok(())
    }
}
