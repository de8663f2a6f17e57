//! Native serial port implementation using the `serialport` crate.
//!
//! This module provides the serial port implementation for native platforms
//! (Linux, macOS, Windows, FreeBSD, etc.).

use {
    crate::{
        error::{Error, Result},
        port::{Port, PortEnumerator, PortInfo, SerialConfig},
    },
    log::{debug, trace},
    serialport::{DataBits, FlowControl, Parity, StopBits},
    std::{
        io::{Read, Write},
        time::Duration,
    },
};

/// Native serial port implementation.
pub struct NativePort {
    port: Option<Box<dyn serialport::SerialPort>>,
    name: String,
    timeout: Duration,
    baud_rate: u32,
}

impl NativePort {
    /// Open a serial port at 8N1 without flow control.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        debug!(
            "Opening {} at {} baud (timeout {:?})",
            config.port_name, config.baud_rate, config.timeout
        );
        let port = serialport::new(&config.port_name, config.baud_rate)
            .timeout(config.timeout)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open()?;

        Ok(Self {
            port: Some(port),
            name: config
                .port_name
                .clone(),
            timeout: config.timeout,
            baud_rate: config.baud_rate,
        })
    }
}

impl Port for NativePort {
    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout == self.timeout {
            return Ok(());
        }
        trace!("Setting read timeout to {timeout:?}");
        if let Some(ref mut p) = self.port {
            p.set_timeout(timeout)?;
        }
        self.timeout = timeout;
        Ok(())
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn close(&mut self) -> Result<()> {
        if self
            .port
            .take()
            .is_some()
        {
            debug!("Closed {}", self.name);
        }
        Ok(())
    }
}

fn closed() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotConnected, "port closed")
}

impl Read for NativePort {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port
            .as_mut()
            .ok_or_else(closed)
            .and_then(|p| p.read(buf))
    }
}

impl Write for NativePort {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port
            .as_mut()
            .ok_or_else(closed)
            .and_then(|p| p.write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.port
            .as_mut()
            .ok_or_else(closed)
            .and_then(std::io::Write::flush)
    }
}

/// Native port enumerator.
pub struct NativePortEnumerator;

impl PortEnumerator for NativePortEnumerator {
    fn list_ports() -> Result<Vec<PortInfo>> {
        let ports = serialport::available_ports().map_err(Error::Enumerate)?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let mut info = PortInfo::named(p.port_name);
                if let serialport::SerialPortType::UsbPort(usb) = p.port_type {
                    info.vid = Some(usb.vid);
                    info.pid = Some(usb.pid);
                    info.manufacturer = usb.manufacturer;
                    info.product = usb.product;
                    info.serial_number = usb.serial_number;
                }
                info
            })
            .collect())
    }
}
