//! Locating the switch among the available serial ports.
//!
//! The switch shows up as a USB CDC device whose port name embeds the
//! hardware serial number, e.g. `/dev/tty.usbmodem002E1E6204511` on macOS.
//! Selection is a plain substring match on the port name.

use crate::error::{Error, Result};
use crate::port::{PortEnumerator, PortInfo};
use log::{debug, info};

/// Serial number fragment that identifies the switch in a port name.
pub const DEFAULT_PORT_PATTERN: &str = "usbmodem002E1E6204511";

/// Port selection options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Substring a port name must contain.
    pub pattern: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PORT_PATTERN.to_string(),
        }
    }
}

impl SelectorConfig {
    /// Selector matching a custom pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Whether a port name matches this selector.
    pub fn matches(&self, name: &str) -> bool {
        name.contains(&self.pattern)
    }
}

/// Pick the first port whose name contains `config.pattern`.
///
/// Ports are examined in the order given; each one examined is logged.
pub fn select_port<I>(ports: I, config: &SelectorConfig) -> Result<PortInfo>
where
    I: IntoIterator<Item = PortInfo>,
{
    for port in ports {
        info!("Found port: {}", port.name);
        if config.matches(&port.name) {
            debug!("Selected {} (matches {:?})", port.name, config.pattern);
            return Ok(port);
        }
    }

    Err(Error::PortNotFound {
        pattern: config
            .pattern
            .clone(),
    })
}

/// Enumerate ports with `E` and select one.
pub fn find_port<E: PortEnumerator>(config: &SelectorConfig) -> Result<PortInfo> {
    let ports = E::list_ports()?;
    debug!("{} serial port(s) available", ports.len());
    select_port(ports, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports(names: &[&str]) -> Vec<PortInfo> {
        names
            .iter()
            .map(|n| PortInfo::named(*n))
            .collect()
    }

    #[test]
    fn test_select_matching_port() {
        let list = ports(&["/dev/tty.usbserial1", "/dev/tty.usbmodem002E1E6204511"]);
        let port = select_port(list, &SelectorConfig::default()).unwrap();
        assert_eq!(port.name, "/dev/tty.usbmodem002E1E6204511");
    }

    #[test]
    fn test_select_first_of_several_matches() {
        let list = ports(&["/dev/ttyACM-abc-1", "/dev/ttyACM-abc-2"]);
        let port = select_port(list, &SelectorConfig::new("abc")).unwrap();
        assert_eq!(port.name, "/dev/ttyACM-abc-1");
    }

    #[test]
    fn test_select_no_match() {
        let list = ports(&["/dev/tty.usbserial1", "/dev/ttyS0"]);
        let err = select_port(list, &SelectorConfig::default()).unwrap_err();
        match err {
            Error::PortNotFound { pattern } => assert_eq!(pattern, DEFAULT_PORT_PATTERN),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_select_empty_list() {
        let err = select_port(Vec::new(), &SelectorConfig::default()).unwrap_err();
        assert!(matches!(err, Error::PortNotFound { .. }));
    }

    struct FakeEnumerator;

    impl PortEnumerator for FakeEnumerator {
        fn list_ports() -> Result<Vec<PortInfo>> {
            Ok(ports(&["COM1", "COM7-usbmodem002E1E6204511"]))
        }
    }

    #[cfg(feature = "native")]
    struct BrokenEnumerator;

    #[cfg(feature = "native")]
    impl PortEnumerator for BrokenEnumerator {
        fn list_ports() -> Result<Vec<PortInfo>> {
            Err(Error::Enumerate(serialport::Error::new(
                serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied),
                "permission denied",
            )))
        }
    }

    #[test]
    fn test_find_port_uses_enumerator() {
        let port = find_port::<FakeEnumerator>(&SelectorConfig::default()).unwrap();
        assert_eq!(port.name, "COM7-usbmodem002E1E6204511");
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_find_port_propagates_enumeration_error() {
        use std::error::Error as _;

        let err = find_port::<BrokenEnumerator>(&SelectorConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Enumerate(_)));
        assert_eq!(err.to_string(), "get ports list: permission denied");

        let source = err
            .source()
            .and_then(|s| s.downcast_ref::<serialport::Error>())
            .expect("serialport error kept as source");
        assert_eq!(
            source.kind,
            serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied)
        );
    }
}
