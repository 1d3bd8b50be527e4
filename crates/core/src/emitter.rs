use core::ffi::CStr;
use core::fmt;

use crate::device::CharDevice;

/// The greeting written by [`crate::run`]: 13 output bytes ending in a line
/// feed, 14 with the NUL terminator.
pub const GREETING: &CStr = c"Hello, RV32!\n";

/// Write every byte of `message` before its NUL terminator to `device`, one
/// write per byte, in order. The terminator itself is never written.
pub fn emit<D: CharDevice + ?Sized>(device: &mut D, message: &CStr) {
    let bytes = message.to_bytes();

    #[cfg(feature = "tracing")]
    tracing::debug!("Emitting {} bytes", bytes.len());

    for &byte in bytes {
        device.write_byte(byte);
    }
}

/// String emitter that owns its output device.
#[derive(Debug, Default)]
pub struct Emitter<D> {
    device: D,
}

impl<D: CharDevice> Emitter<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Write `message` from its first byte up to (not including) the
    /// terminator. Nothing carries over between calls.
    pub fn emit(&mut self, message: &CStr) {
        emit(&mut self.device, message);
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}

impl<D: CharDevice> fmt::Write for Emitter<D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.device.write_byte(byte);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;
    use core::fmt::Write;

    #[test]
    fn test_emit_writes_bytes_in_order() {
        let mut rec = Recorder::new();
        emit(&mut rec, c"ABC");
        assert_eq!(rec.writes(), b"ABC");
    }

    #[test]
    fn test_emit_empty_message_writes_nothing() {
        let mut rec = Recorder::new();
        emit(&mut rec, c"");
        assert!(rec.is_empty());
    }

    #[test]
    fn test_emit_stops_at_first_nul() {
        let raw = b"ok\0ignored\0";
        let message = CStr::from_bytes_until_nul(raw).unwrap();

        let mut rec = Recorder::new();
        emit(&mut rec, message);
        assert_eq!(rec.writes(), b"ok");
    }

    #[test]
    fn test_emit_twice_repeats_sequence() {
        let mut rec = Recorder::new();
        emit(&mut rec, c"hi\n");
        emit(&mut rec, c"hi\n");
        assert_eq!(rec.writes(), b"hi\nhi\n");
    }

    #[test]
    fn test_emit_through_trait_object() {
        let mut rec = Recorder::new();
        let device: &mut dyn CharDevice = &mut rec;
        emit(device, c"dyn");
        assert_eq!(rec.writes(), b"dyn");
    }

    #[test]
    fn test_greeting_length() {
        assert_eq!(GREETING.to_bytes().len(), 13);
        assert_eq!(GREETING.to_bytes_with_nul().len(), 14);
        assert_eq!(GREETING.to_bytes_with_nul().last(), Some(&0));
    }

    #[test]
    fn test_emitter_owns_device() {
        let mut emitter = Emitter::new(Recorder::new());
        emitter.emit(c"one");
        assert_eq!(emitter.device().writes(), b"one");

        emitter.device_mut().take();
        emitter.emit(c"two");
        assert_eq!(emitter.into_inner().writes(), b"two");
    }

    #[test]
    fn test_emitter_fmt_write() {
        let mut emitter = Emitter::new(Recorder::new());
        write!(emitter, "pc={:#x}", 0x80u32).unwrap();
        assert_eq!(emitter.device().as_str_lossy(), "pc=0x80");
    }
}
