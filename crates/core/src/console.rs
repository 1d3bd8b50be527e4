//! Host console devices for running the entry sequence outside the
//! simulator.

use std::io;

use crate::device::CharDevice;

/// Forwards each byte to `W` as soon as it is written.
///
/// The write path is infallible, so the first I/O error is kept and later
/// bytes are dropped. Check [`Unbuffered::take_error`] once done.
#[derive(Debug)]
pub struct Unbuffered<W: io::Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: io::Write> Unbuffered<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> CharDevice for Unbuffered<W> {
    fn write_byte(&mut self, byte: u8) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(&[byte]).and_then(|_| self.out.flush()) {
            self.error = Some(e);
        }
    }
}

/// Holds bytes until a line feed, then forwards the whole line to `W`.
///
/// Same error policy as [`Unbuffered`]. A trailing partial line stays pending
/// until [`LineBuffered::flush_pending`].
#[derive(Debug)]
pub struct LineBuffered<W: io::Write> {
    out: W,
    line: Vec<u8>,
    error: Option<io::Error>,
}

impl<W: io::Write> LineBuffered<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line: Vec::new(),
            error: None,
        }
    }

    /// Bytes written since the last line feed.
    pub fn pending(&self) -> &[u8] {
        &self.line
    }

    pub fn flush_pending(&mut self) {
        if !self.line.is_empty() {
            self.forward_line();
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn forward_line(&mut self) {
        let result = self
            .out
            .write_all(&self.line)
            .and_then(|_| self.out.flush());
        self.line.clear();
        if let Err(e) = result {
            self.error = Some(e);
        }
    }
}

impl<W: io::Write> CharDevice for LineBuffered<W> {
    fn write_byte(&mut self, byte: u8) {
        if self.error.is_some() {
            return;
        }
        self.line.push(byte);
        if byte == b'\n' {
            self.forward_line();
        }
    }
}
