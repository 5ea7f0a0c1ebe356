//! A host-side Rust driver for **NZS** closed-loop stepper controllers.
//!
//! The controller is driven over a serial console with one ASCII command per
//! line (`move 90.00 30`, `setzero`, `readpos`, ...). Only `readpos` is
//! answered: the reply is free-form text without a length or a guaranteed
//! terminator, so it is framed by silence and then scanned for `encoder <deg>`.
//!
//! ```no_run
//! use nzs_servo_rs::{Controller, ControlMode, LinkConfig, SerialTransport, DEFAULT_MOVE_SPEED};
//!
//! # fn main() -> nzs_servo_rs::Result<()> {
//! let link = LinkConfig::from_env()?;
//! let transport = SerialTransport::open(&link.port, link.baud_rate)?;
//! let mut controller = Controller::new(transport);
//!
//! controller.set_control_mode(ControlMode::SimplePid)?;
//! controller.move_to_angle(90.0, DEFAULT_MOVE_SPEED)?;
//! let position = controller.read_position()?;
//! println!("at {position}°");
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod command;
pub mod config;
pub mod controller;
pub mod direction;
pub mod enums;
mod errors;
pub mod framer;
pub mod response;
pub mod sim;
pub mod transport;

pub use clock::{Clock, SystemClock};
pub use command::Command;
pub use config::{BAUD_RATE, ControllerConfig, LinkConfig, WriteErrorPolicy};
pub use controller::{Controller, DEFAULT_MOVE_SPEED};
pub use direction::Direction;
pub use enums::{ControlMode, InvalidControlMode};
pub use errors::{Error, ParseError};
pub use framer::{
    FrameStatus, FramerState, IDLE_TIMEOUT, OVERALL_TIMEOUT, RawFrame, ResponseFramer, Timeouts,
};
pub use response::{POSITION_LABEL, PositionReply, parse_position};
#[cfg(feature = "serial")]
pub use transport::SerialTransport;
pub use transport::{LINE_TERMINATOR, Transport};

/// Result type for controller operations.
pub type Result<T> = core::result::Result<T, Error>;
