//! Byte-stream collaborator used by the [`Controller`](crate::Controller).
//!
//! The protocol needs only three primitives: a non-blocking availability check,
//! a single-byte read and a line write. [`SerialTransport`] provides them over
//! a real serial port; [`ScriptedTransport`](crate::sim::ScriptedTransport)
//! provides them for tests.

use std::io;

/// Terminator appended to every outgoing command line.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Duplex byte stream to the controller.
pub trait Transport {
    /// Returns true if a byte can be read without blocking.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the stream is broken.
    fn is_byte_available(&mut self) -> io::Result<bool>;

    /// Reads one byte. Only valid after `is_byte_available` returned true.
    ///
    /// # Errors
    /// Returns the underlying I/O error, or `WouldBlock` if no byte is pending.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Writes `line` followed by [`LINE_TERMINATOR`] and flushes.
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn is_byte_available(&mut self) -> io::Result<bool> {
        (**self).is_byte_available()
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        (**self).read_byte()
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

#[cfg(feature = "serial")]
pub use self::serial_port::SerialTransport;

#[cfg(feature = "serial")]
mod serial_port {
    use std::fmt;
    use std::io::{self, Read, Write};
    use std::time::Duration;

    use serial::{SerialPort, SerialPortSettings};

    use super::{LINE_TERMINATOR, Transport};

    /// Read timeout used to probe for a pending byte.
    const PROBE_TIMEOUT: Duration = Duration::from_millis(1);

    /// [`Transport`] over a serial port, 8N1 without flow control.
    pub struct SerialTransport {
        port: Box<dyn SerialPort + Send>,
        lookahead: Option<u8>,
    }

    impl fmt::Debug for SerialTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("SerialTransport")
                .field("lookahead", &self.lookahead)
                .finish_non_exhaustive()
        }
    }

    impl SerialTransport {
        /// Opens and configures the serial port at `path`.
        ///
        /// # Errors
        /// Returns an I/O error if the port cannot be opened or configured.
        pub fn open(path: &str, baud_rate: u32) -> io::Result<Self> {
            let mut port = serial::open(path)?;
            let baud = serial::BaudRate::from_speed(baud_rate as usize);
            port.reconfigure(&|settings: &mut dyn SerialPortSettings| {
                settings.set_baud_rate(baud)?;
                settings.set_char_size(serial::Bits8);
                settings.set_parity(serial::ParityNone);
                settings.set_stop_bits(serial::Stop1);
                settings.set_flow_control(serial::FlowNone);
                Ok(())
            })?;
            port.set_timeout(PROBE_TIMEOUT)?;
            tracing::debug!(path, baud_rate, "serial port open");
            Ok(Self::from_port(Box::new(port)))
        }

        /// Wraps an already configured port.
        #[must_use]
        pub fn from_port(port: Box<dyn SerialPort + Send>) -> Self {
            Self {
                port,
                lookahead: None,
            }
        }
    }

    impl Transport for SerialTransport {
        fn is_byte_available(&mut self) -> io::Result<bool> {
            if self.lookahead.is_some() {
                return Ok(true);
            }
            let mut buf = [0u8; 1];
            match self.port.read(&mut buf) {
                Ok(1) => {
                    self.lookahead = Some(buf[0]);
                    Ok(true)
                }
                Ok(_) => Ok(false),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(false),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
                Err(e) => Err(e),
            }
        }

        fn read_byte(&mut self) -> io::Result<u8> {
            if !self.is_byte_available()? {
                return Err(io::ErrorKind::WouldBlock.into());
            }
            self.lookahead
                .take()
                .ok_or_else(|| io::ErrorKind::WouldBlock.into())
        }

        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.port.write_all(line.as_bytes())?;
            self.port.write_all(LINE_TERMINATOR.as_bytes())?;
            self.port.flush()
        }
    }
}
