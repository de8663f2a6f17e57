//! Port abstraction for serial communication.
//!
//! The protocol and channel code only ever sees the [`Port`] trait, so it can
//! be driven by the native serial port or by an in-memory stand-in.
//!
//! ```text
//! +------------------+
//! |  CommandChannel  |
//! +--------+---------+
//!          |
//!          v
//! +--------+---------+
//! |    Port Trait    |
//! +--------+---------+
//!          |
//!          v
//! +--------+---------+
//! | Native SerialPort|
//! |   (serialport)   |
//! +------------------+
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use pwswitch::port::Port;
//! use std::time::Duration;
//!
//! fn example<P: Port>(port: &mut P) -> Result<(), Box<dyn std::error::Error>> {
//!     port.set_timeout(Duration::from_secs(5))?;
//!     port.write_all(b"PW=1\r\n")?;
//!
//!     let mut buf = [0u8; 32];
//!     let n = port.read(&mut buf)?;
//!     println!("Received: {:?}", &buf[..n]);
//!
//!     Ok(())
//! }
//! ```

#[cfg(test)]
pub(crate) mod mock;
#[cfg(feature = "native")]
pub mod native;

use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

/// Baud rate the switch firmware listens at.
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Serial port configuration.
///
/// The switch always talks 8N1 without flow control, so only the port, the
/// speed and the read deadline are configurable.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Port name/path (e.g., "/dev/ttyACM0", "COM3").
    pub port_name: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Read/write timeout.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_secs(5),
        }
    }
}

impl SerialConfig {
    /// Create a new configuration with port name and baud rate.
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            ..Default::default()
        }
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Serial port information.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortInfo {
    /// Port name/path.
    pub name: String,
    /// USB vendor ID (if available).
    pub vid: Option<u16>,
    /// USB product ID (if available).
    pub pid: Option<u16>,
    /// Manufacturer string (if available).
    pub manufacturer: Option<String>,
    /// Product string (if available).
    pub product: Option<String>,
    /// Serial number (if available).
    pub serial_number: Option<String>,
}

impl PortInfo {
    /// Port with a name and no USB details.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vid: None,
            pid: None,
            manufacturer: None,
            product: None,
            serial_number: None,
        }
    }
}

/// Byte-stream connection to the switch.
///
/// Reads must honour [`Port::timeout`]: a read that sees no data within the
/// timeout returns an error of kind [`std::io::ErrorKind::TimedOut`] instead
/// of blocking forever.
pub trait Port: Read + Write + Send {
    /// Set the read/write timeout.
    fn set_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Get the current timeout.
    fn timeout(&self) -> Duration;

    /// Get the current baud rate.
    fn baud_rate(&self) -> u32;

    /// Get the port name/path.
    fn name(&self) -> &str;

    /// Close the port and release resources.
    ///
    /// After calling this method, the port cannot be used for further I/O.
    fn close(&mut self) -> Result<()>;
}

/// Trait for listing available serial ports.
///
/// This is separated from `Port` because it's a static operation that
/// doesn't require an open port instance.
pub trait PortEnumerator {
    /// List all available serial ports, in the order the OS reports them.
    fn list_ports() -> Result<Vec<PortInfo>>;
}

#[cfg(feature = "native")]
pub use native::{NativePort, NativePortEnumerator};
