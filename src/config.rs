use std::env;
use std::time::Duration;

use crate::errors::Error;
use crate::framer::Timeouts;

/// Bit rate the controller's command port runs at.
pub const BAUD_RATE: u32 = 115_200;

/// Interval between framer polls while waiting for a reply.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Environment variable holding the serial port path.
pub const ENV_PORT: &str = "NZS_ENV_UART";

/// Environment variable overriding [`BAUD_RATE`].
pub const ENV_BAUD: &str = "NZS_ENV_BAUD";

/// What to do when a fire-and-forget command cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteErrorPolicy {
    /// Return the transport error to the caller.
    #[default]
    Propagate,
    /// Log the failure and report success.
    Ignore,
}

/// Tuning for a [`Controller`](crate::Controller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Reply framing thresholds.
    pub timeouts: Timeouts,
    /// Sleep between polls while waiting for a reply. Zero busy-polls.
    pub poll_interval: Duration,
    /// Handling of write failures on commands without a reply.
    pub write_errors: WriteErrorPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            timeouts: Timeouts::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            write_errors: WriteErrorPolicy::default(),
        }
    }
}

impl ControllerConfig {
    /// Sets the write failure policy.
    #[must_use]
    pub const fn with_write_errors(mut self, policy: WriteErrorPolicy) -> Self {
        self.write_errors = policy;
        self
    }
}

/// Serial link settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Serial port path, e.g. `/dev/ttyUSB0`.
    pub port: String,
    /// Bit rate.
    pub baud_rate: u32,
}

impl LinkConfig {
    /// Link on `port` at the default [`BAUD_RATE`].
    #[must_use]
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: BAUD_RATE,
        }
    }

    /// Loads `.env` if present, then reads [`ENV_PORT`] and [`ENV_BAUD`].
    ///
    /// # Errors
    /// Returns `Error::Config` if the port is unset or the baud rate is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let port = lookup(ENV_PORT)
            .filter(|port| !port.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{ENV_PORT} is not set")))?;
        let baud_rate = match lookup(ENV_BAUD) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(rate) if rate > 0 => rate,
                _ => return Err(Error::Config(format!("{ENV_BAUD}={raw:?} is not a baud rate"))),
            },
            None => BAUD_RATE,
        };
        Ok(Self { port, baud_rate })
    }
}
