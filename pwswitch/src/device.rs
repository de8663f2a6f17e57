//! High-level handle on a connected power switch.

use crate::channel::{ChannelConfig, CommandChannel};
use crate::error::Result;
use crate::port::{DEFAULT_BAUD_RATE, Port};
use crate::protocol::{Command, Response};
use crate::select::SelectorConfig;

/// Everything needed to find, open and talk to the switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Explicit port name; when `None` the selector picks one.
    pub port: Option<String>,
    /// How to pick the port when none is given.
    pub selector: SelectorConfig,
    /// Baud rate to open the port at.
    pub baud_rate: u32,
    /// Exchange options.
    pub channel: ChannelConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            port: None,
            selector: SelectorConfig::default(),
            baud_rate: DEFAULT_BAUD_RATE,
            channel: ChannelConfig::default(),
        }
    }
}

/// A power switch behind an open connection.
///
/// Dropping the switch drops, and so closes, its connection.
pub struct PowerSwitch<P: Port> {
    port: P,
    channel: ChannelConfig,
}

impl<P: Port> PowerSwitch<P> {
    /// Wrap an already open connection.
    pub fn new(port: P, channel: ChannelConfig) -> Self {
        Self { port, channel }
    }

    /// Name of the underlying port.
    pub fn port_name(&self) -> &str {
        self.port
            .name()
    }

    /// Run one exchange.
    pub fn send(&mut self, command: Command) -> Result<Vec<Response>> {
        CommandChannel::with_config(&mut self.port, self.channel).send_request(command)
    }

    /// Ask for the current power state.
    pub fn status(&mut self) -> Result<Vec<Response>> {
        self.send(Command::Inquire)
    }

    /// Cut power.
    pub fn turn_off(&mut self) -> Result<Vec<Response>> {
        self.send(Command::TurnOff)
    }

    /// Restore power.
    pub fn turn_on(&mut self) -> Result<Vec<Response>> {
        self.send(Command::TurnOn)
    }

    /// Close the connection now instead of on drop.
    pub fn close(mut self) -> Result<()> {
        self.port
            .close()
    }

    /// Give the connection back.
    pub fn into_inner(self) -> P {
        self.port
    }
}

#[cfg(feature = "native")]
mod native_open {
    use super::{DeviceConfig, PowerSwitch};
    use crate::error::Result;
    use crate::port::{NativePort, NativePortEnumerator, Port, PortEnumerator, SerialConfig};
    use crate::select::find_port;
    use log::info;

    impl PowerSwitch<NativePort> {
        /// Open the port named in `config`, or the one the selector finds.
        pub fn open(config: &DeviceConfig) -> Result<Self> {
            Self::connect::<NativePortEnumerator>(config)
        }

        /// Like [`PowerSwitch::open`], enumerating ports with `E`.
        pub fn connect<E: PortEnumerator>(config: &DeviceConfig) -> Result<Self> {
            let name = match &config.port {
                Some(name) => name.clone(),
                None => find_port::<E>(&config.selector)?.name,
            };

            let serial = SerialConfig::new(name, config.baud_rate)
                .with_timeout(config.channel.read_timeout);
            let port = NativePort::open(&serial)?;
            info!("Connected to {} at {} baud", port.name(), port.baud_rate());

            Ok(Self::new(port, config.channel))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::mock::MockPort;
    use std::time::Duration;

    fn switch(port: MockPort) -> PowerSwitch<MockPort> {
        PowerSwitch::new(port, ChannelConfig::default())
    }

    #[test]
    fn test_default_config() {
        let config = DeviceConfig::default();
        assert_eq!(config.port, None);
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.selector.pattern, "usbmodem002E1E6204511");
        assert_eq!(config.channel.read_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_status_off_on_sequence() {
        let port = MockPort::silent()
            .on(b"PW=?\r\n", b"PW=1\r\n")
            .on(b"PW=0\r\n", b"PW=0\r\nOK\r\n")
            .on(b"PW=1\r\n", b"PW=1\r\nOK\r\n");
        let mut sw = switch(port);

        assert_eq!(sw.status().unwrap(), vec![Response::On]);
        assert_eq!(sw.turn_off().unwrap(), vec![Response::Off, Response::Ok]);
        assert_eq!(sw.turn_on().unwrap(), vec![Response::On, Response::Ok]);

        let port = sw.into_inner();
        assert_eq!(port.write_buf, b"PW=?\r\nPW=0\r\nPW=1\r\n");
    }

    #[test]
    fn test_error_does_not_poison_switch() {
        let port = MockPort::silent()
            .on(b"PW=0\r\n", b"ERROR\r\n")
            .on(b"PW=?\r\n", b"PW=1\r\n");
        let mut sw = switch(port);

        assert!(sw.turn_off().is_err());
        assert_eq!(sw.status().unwrap(), vec![Response::On]);
    }

    #[test]
    fn test_exchange_on_closed_port_fails() {
        let port = MockPort::silent();
        let mut sw = switch(port);
        sw.port
            .close()
            .unwrap();
        assert!(sw.port.closed);
        assert!(sw.status().is_err());
    }

    #[test]
    fn test_port_name() {
        assert_eq!(switch(MockPort::silent()).port_name(), "mock");
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_open_reports_missing_device() {
        use crate::error::Error;
        use crate::port::{NativePort, PortEnumerator, PortInfo};

        struct NoSwitch;

        impl PortEnumerator for NoSwitch {
            fn list_ports() -> Result<Vec<PortInfo>> {
                Ok(vec![PortInfo::named("/dev/ttyS0")])
            }
        }

        let result = PowerSwitch::<NativePort>::connect::<NoSwitch>(&DeviceConfig::default());
        assert!(matches!(result, Err(Error::PortNotFound { .. })));
    }
}
