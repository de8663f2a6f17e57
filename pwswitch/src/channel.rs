//! One request/response exchange with the switch.
//!
//! The firmware has no length prefix or end-of-reply marker: after a command
//! it prints some lines and then goes quiet. An exchange therefore reads lines
//! until a read sees no data within the configured timeout, and that silence
//! is taken as the end of the reply rather than as a failure.
//!
//! The timeout is the connection's own read deadline ([`Port::set_timeout`]),
//! so no read is ever left running in the background once an exchange
//! returns.

use crate::error::{Error, Result};
use crate::port::Port;
use crate::protocol::{Command, Response, parse_response};
use log::{debug, trace};
use std::io::{ErrorKind, Read};
use std::time::Duration;

/// How long the device may stay silent before its reply is considered done.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Bytes requested from the port per read.
const READ_CHUNK: usize = 64;

/// Longest reply line accepted before the exchange is abandoned.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Exchange options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Silence after which the reply is treated as complete.
    pub read_timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Request/response exchanges over a borrowed port.
pub struct CommandChannel<'a, P: Port> {
    port: &'a mut P,
    config: ChannelConfig,
}

impl<'a, P: Port> CommandChannel<'a, P> {
    /// Create a channel with the default read timeout.
    pub fn new(port: &'a mut P) -> Self {
        Self {
            port,
            config: ChannelConfig::default(),
        }
    }

    /// Create a channel with custom configuration.
    pub fn with_config(port: &'a mut P, config: ChannelConfig) -> Self {
        Self { port, config }
    }

    /// Send `command` and collect every reply line until the device goes
    /// quiet.
    ///
    /// Returns the parsed replies in arrival order; the list is empty when the
    /// device says nothing before the timeout. The first line that does not
    /// parse aborts the exchange and nothing parsed before it is returned.
    pub fn send_request(&mut self, command: Command) -> Result<Vec<Response>> {
        self.port
            .set_timeout(self.config.read_timeout)?;

        let request = command.encode();
        debug!("Sending {:?} to {}", request.trim_end(), self.port.name());
        self.port
            .write_all(request.as_bytes())
            .and_then(|()| self.port.flush())
            .map_err(Error::SendRequest)?;

        let mut lines = LineReader::new(&mut *self.port);
        let mut responses = Vec::new();
        let mut index = 0;
        while let Some(line) = lines.next_line()? {
            trace!("Line {index}: {line:?}");
            let response =
                parse_response(&line).map_err(|source| Error::ParseResponse { index, source })?;
            responses.push(response);
            index += 1;
        }

        debug!("{command:?} -> {responses:?}");
        Ok(responses)
    }
}

/// Splits a byte stream into newline-terminated lines.
///
/// A read timeout ends the stream just like a real end-of-file does. A
/// trailing `\r` is dropped from each line, and bytes left over without a
/// terminator when the stream ends form one last line. A line that grows
/// past [`MAX_LINE_LEN`] without a terminator is an error.
struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            eof: false,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self
                .buf
                .iter()
                .position(|&b| b == b'\n')
            {
                let line: Vec<u8> = self
                    .buf
                    .drain(..=pos)
                    .collect();
                return Ok(Some(decode_line(&line[..pos])));
            }

            if self.eof {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let rest = std::mem::take(&mut self.buf);
                return Ok(Some(decode_line(&rest)));
            }

            if self.buf.len() >= MAX_LINE_LEN {
                return Err(Error::ReadResponse(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("reply line exceeds {MAX_LINE_LEN} bytes"),
                )));
            }

            self.fill()?;
        }
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        match self.inner.read(&mut chunk) {
            Ok(0) => {
                debug!("Connection reached end of stream");
                self.eof = true;
            },
            Ok(n) => self
                .buf
                .extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => {},
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                debug!("No more data before timeout");
                self.eof = true;
            },
            Err(e) => return Err(Error::ReadResponse(e)),
        }
        Ok(())
    }
}

fn decode_line(line: &[u8]) -> String {
    let line = line
        .strip_suffix(b"\r")
        .unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
