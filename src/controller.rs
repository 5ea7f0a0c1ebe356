//! Request/response orchestration over an owned [`Transport`].

use crate::Result;
use crate::clock::{Clock, SystemClock};
use crate::command::Command;
use crate::config::{ControllerConfig, WriteErrorPolicy};
use crate::direction::Direction;
use crate::enums::ControlMode;
use crate::errors::Error;
use crate::framer::{FrameStatus, ResponseFramer};
use crate::response::PositionReply;
use crate::transport::Transport;

/// Default speed argument for [`Controller::move_to_angle`] callers.
pub const DEFAULT_MOVE_SPEED: i32 = 30;

/// Driver for one NZS controller.
///
/// The link is half-duplex: every method runs to completion before the next
/// command can be issued, which `&mut self` enforces.
#[derive(Debug)]
pub struct Controller<T, C = SystemClock> {
    transport: T,
    clock: C,
    config: ControllerConfig,
}

impl<T: Transport> Controller<T> {
    /// Creates a controller with the default configuration and wall-clock time.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_clock(transport, SystemClock::new(), ControllerConfig::default())
    }
}

impl<T: Transport, C: Clock> Controller<T, C> {
    /// Creates a controller with an explicit clock and configuration.
    #[must_use]
    pub const fn with_clock(transport: T, clock: C, config: ControllerConfig) -> Self {
        Self {
            transport,
            clock,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Borrows the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrows the transport.
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Releases the transport.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Writes a command line without waiting for any acknowledgement.
    ///
    /// `ReadPosition` is written like any other command; use
    /// [`read_position`](Self::read_position) to also collect the reply.
    ///
    /// # Errors
    /// Returns `Error::Transport` if the write fails and the configured
    /// [`WriteErrorPolicy`] is `Propagate`.
    pub fn send_command(&mut self, command: &Command) -> Result<()> {
        match self.write(command) {
            Err(Error::Transport(e)) if self.config.write_errors == WriteErrorPolicy::Ignore => {
                tracing::warn!(%command, error = %e, "write failed, ignoring");
                Ok(())
            }
            other => other,
        }
    }

    /// Queries the encoder position.
    ///
    /// Stale input is discarded, `readpos` is written, and the reply is framed
    /// by the idle and overall timeouts before being parsed.
    ///
    /// # Errors
    /// - `Error::Timeout` if no byte arrived within the overall timeout.
    /// - `Error::InvalidResponse` if the reply has no usable `encoder` value.
    /// - `Error::Transport` if the link failed.
    pub fn read_position(&mut self) -> Result<PositionReply> {
        let stale = ResponseFramer::drain(&mut self.transport)?;
        if stale > 0 {
            tracing::debug!(bytes = stale, "discarded stale input");
        }

        self.write(&Command::ReadPosition)?;

        let mut framer = ResponseFramer::new(self.config.timeouts);
        framer.start(&self.clock);
        let frame = loop {
            match framer.poll(&mut self.transport, &self.clock)? {
                FrameStatus::Complete(frame) => break frame,
                FrameStatus::Failed => {
                    tracing::warn!(timeout = ?self.config.timeouts.overall, "no response to readpos");
                    return Err(Error::Timeout);
                }
                FrameStatus::Pending | FrameStatus::Inactive => {
                    self.clock.sleep(self.config.poll_interval);
                }
            }
        };

        tracing::trace!(reply = %String::from_utf8_lossy(frame.as_bytes()), "readpos reply");
        match frame.into_position() {
            Ok(position) => {
                tracing::debug!(%position, "current position");
                Ok(position)
            }
            Err(e) => {
                tracing::warn!(error = %e, "invalid response");
                Err(e.into())
            }
        }
    }

    /// Selects the control mode. `ControlMode::default()` is `SimplePid`.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn set_control_mode(&mut self, mode: ControlMode) -> Result<()> {
        self.send_command(&Command::SetControlMode(mode))
    }

    /// Sets the maximum run current.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn set_max_current(&mut self, value: u32) -> Result<()> {
        self.send_command(&Command::SetMaxCurrent(value))
    }

    /// Sets the holding current.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn set_hold_current(&mut self, value: u32) -> Result<()> {
        self.send_command(&Command::SetHoldCurrent(value))
    }

    /// Sets the full steps per rotation.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn set_steps_per_rotation(&mut self, value: u32) -> Result<()> {
        self.send_command(&Command::SetStepsPerRotation(value))
    }

    /// Moves to an absolute angle. [`DEFAULT_MOVE_SPEED`] is the usual speed.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn move_to_angle(&mut self, angle: f64, speed: i32) -> Result<()> {
        self.send_command(&Command::MoveToAngle { angle, speed })
    }

    /// Moves a relative number of steps.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn move_steps(&mut self, direction: Direction, count: i32) -> Result<()> {
        self.send_command(&Command::MoveSteps { direction, count })
    }

    /// Sets the microstepping divisor.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn set_microstep(&mut self, steps: u8) -> Result<()> {
        self.send_command(&Command::SetMicrostep(steps))
    }

    /// Stops the current move.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn stop(&mut self) -> Result<()> {
        self.send_command(&Command::Stop)
    }

    /// Redefines the current position in degrees.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn set_position(&mut self, position: f64) -> Result<()> {
        self.send_command(&Command::SetPosition(position))
    }

    /// Redefines the current position as zero.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn set_zero(&mut self) -> Result<()> {
        self.send_command(&Command::SetZero)
    }

    /// Hands motor enable to the EN pin, or takes it back.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn enable_pin_mode(&mut self, enable: bool) -> Result<()> {
        self.send_command(&Command::EnablePinMode(enable))
    }

    /// Starts encoder calibration.
    ///
    /// # Errors
    /// See [`send_command`](Self::send_command).
    pub fn calibrate(&mut self) -> Result<()> {
        self.send_command(&Command::Calibrate)
    }

    fn write(&mut self, command: &Command) -> Result<()> {
        let line = command.encode();
        tracing::debug!(%line, "tx");
        self.transport.write_line(&line)?;
        Ok(())
    }
}
