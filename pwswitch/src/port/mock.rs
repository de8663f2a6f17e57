//! Scripted in-memory port used by the unit tests.
//!
//! Unlike `Cursor<Vec<u8>>`, reads and writes are independent. Each complete
//! line written is looked up in the script and the matching reply is queued
//! for reading. Reads on an empty queue fail with `TimedOut`, the way a serial
//! port with a read timeout behaves when the device stays silent.

use crate::error::Result;
use crate::port::Port;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

pub(crate) struct MockPort {
    read_buf: VecDeque<u8>,
    pub(crate) write_buf: Vec<u8>,
    pending: Vec<u8>,
    script: Vec<(Vec<u8>, Vec<u8>)>,
    /// Largest number of bytes handed out per `read` call.
    pub(crate) chunk: usize,
    /// Error kind returned once the read queue is drained, `None` for EOF.
    pub(crate) drained: Option<io::ErrorKind>,
    /// When set, every write fails with this kind.
    pub(crate) write_error: Option<io::ErrorKind>,
    pub(crate) timeout: Duration,
    pub(crate) closed: bool,
}

impl MockPort {
    /// Port that never says anything.
    pub(crate) fn silent() -> Self {
        Self {
            read_buf: VecDeque::new(),
            write_buf: Vec::new(),
            pending: Vec::new(),
            script: Vec::new(),
            chunk: usize::MAX,
            drained: Some(io::ErrorKind::TimedOut),
            write_error: None,
            timeout: Duration::from_millis(1000),
            closed: false,
        }
    }

    /// Port with bytes already waiting to be read.
    pub(crate) fn preloaded(data: &[u8]) -> Self {
        let mut port = Self::silent();
        port.read_buf
            .extend(data.iter().copied());
        port
    }

    /// Queue `reply` to be readable after `request` has been written.
    pub(crate) fn on(mut self, request: &[u8], reply: &[u8]) -> Self {
        self.script
            .push((request.to_vec(), reply.to_vec()));
        self
    }

    fn line_written(&mut self, line: &[u8]) {
        if let Some((_, reply)) = self
            .script
            .iter()
            .find(|(req, _)| req == line)
        {
            self.read_buf
                .extend(reply.iter().copied());
        }
    }
}

impl io::Read for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "port closed"));
        }
        if self.read_buf.is_empty() {
            return match self.drained {
                Some(kind) => Err(io::Error::new(kind, "no data")),
                None => Ok(0),
            };
        }
        let n = buf
            .len()
            .min(self.chunk)
            .min(self.read_buf.len());
        for (dst, src) in buf
            .iter_mut()
            .zip(self.read_buf.drain(..n))
        {
            *dst = src;
        }
        Ok(n)
    }
}

impl io::Write for MockPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.write_error {
            return Err(io::Error::new(kind, "write failed"));
        }
        self.write_buf
            .extend_from_slice(buf);
        self.pending
            .extend_from_slice(buf);
        while let Some(pos) = self
            .pending
            .iter()
            .position(|&b| b == b'\n')
        {
            let line: Vec<u8> = self
                .pending
                .drain(..=pos)
                .collect();
            self.line_written(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Port for MockPort {
    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.timeout = timeout;
        Ok(())
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn baud_rate(&self) -> u32 {
        115200
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
