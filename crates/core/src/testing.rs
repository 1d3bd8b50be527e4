//! In-memory device for host tests.

use std::borrow::Cow;

use crate::device::CharDevice;

/// Records every write in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Recorder {
    writes: Vec<u8>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> &[u8] {
        &self.writes
    }

    pub fn as_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.writes)
    }

    /// Return the writes seen so far and start over.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.writes)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl CharDevice for Recorder {
    fn write_byte(&mut self, byte: u8) {
        self.writes.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_take_resets() {
        let mut rec = Recorder::new();
        rec.write_byte(b'a');
        rec.write_byte(b'b');
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.take(), b"ab".to_vec());
        assert!(rec.is_empty());
    }
}
