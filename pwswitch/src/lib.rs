//! # pwswitch
//!
//! A library for driving USB-serial power switches that speak the `PW=`
//! line protocol.
//!
//! This crate provides:
//!
//! - The wire codec for commands (`PW=0`, `PW=1`, `PW=?`) and replies
//! - Port discovery by a substring of the device's port name
//! - Request/response exchanges that treat a read timeout as the end of the
//!   reply
//!
//! ## Features
//!
//! - `native` (default): Native serial port support via the `serialport` crate
//! - `serde`: Serialization support for data types
//!
//! ## Example
//!
//! ```rust,no_run
//! use pwswitch::{DeviceConfig, NativePort, PowerSwitch};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     #[cfg(feature = "native")]
//!     {
//!         let mut switch = PowerSwitch::<NativePort>::open(&DeviceConfig::default())?;
//!
//!         println!("status: {:?}", switch.status()?);
//!         println!("off: {:?}", switch.turn_off()?);
//!         println!("on: {:?}", switch.turn_on()?);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod device;
pub mod error;
pub mod port;
pub mod protocol;
pub mod select;

// Re-exports for convenience
#[cfg(feature = "native")]
pub use port::{NativePort, NativePortEnumerator};
pub use {
    channel::{ChannelConfig, CommandChannel, DEFAULT_READ_TIMEOUT, MAX_LINE_LEN},
    device::{DeviceConfig, PowerSwitch},
    error::{Error, ResponseError, Result},
    port::{DEFAULT_BAUD_RATE, Port, PortEnumerator, PortInfo, SerialConfig},
    protocol::{Command, PREFIX, Response, SUFFIX, parse_response},
    select::{DEFAULT_PORT_PATTERN, SelectorConfig, find_port, select_port},
};
