use core::ffi::c_char;

/// Base address of the UART data register on the RV32 simulator bus.
pub const UART_BASE: usize = 0x1000_0000;

/// Byte-wide, write-only output capability.
///
/// A write cannot fail from the caller's point of view. Whatever happens to
/// the byte afterwards belongs to the device behind the handle.
pub trait CharDevice {
    /// Store one byte. Every call is one observable write.
    fn write_byte(&mut self, byte: u8);

    /// Store a C character value, narrowed to 8 bits.
    fn write_char(&mut self, c: c_char) {
        self.write_byte(c as u8);
    }
}

impl<D: CharDevice + ?Sized> CharDevice for &mut D {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }
}

/// Memory-mapped byte register at a fixed address.
///
/// Every [`CharDevice::write_byte`] is a single volatile store, so the
/// compiler never drops, merges, caches or reorders it against other
/// volatile accesses.
#[derive(Debug)]
pub struct MmioRegister {
    ptr: *mut u8,
}

impl MmioRegister {
    /// # Safety
    ///
    /// `addr` must be a writable byte register (or ordinary writable memory)
    /// for as long as the handle exists, and nothing else may rely on the
    /// contents at that address.
    pub const unsafe fn new(addr: usize) -> Self {
        Self {
            ptr: addr as *mut u8,
        }
    }

    /// Handle for the UART data register at [`UART_BASE`].
    ///
    /// # Safety
    ///
    /// Only sound on a target whose bus decodes [`UART_BASE`] to the UART.
    pub const unsafe fn uart() -> Self {
        Self::new(UART_BASE)
    }

    pub fn addr(&self) -> usize {
        self.ptr as usize
    }
}

impl CharDevice for MmioRegister {
    #[inline]
    fn write_byte(&mut self, byte: u8) {
        #[cfg(feature = "tracing")]
        tracing::trace!("MMIO write {:#04x} -> {:#x}", byte, self.addr());

        unsafe {
            core::ptr::write_volatile(self.ptr, byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;

    #[test]
    fn test_mmio_register_stores_to_address() {
        let mut cell: u8 = 0;
        let cell_ptr = &mut cell as *mut u8;
        let mut reg = unsafe { MmioRegister::new(cell_ptr as usize) };

        reg.write_byte(b'A');
        assert_eq!(unsafe { cell_ptr.read_volatile() }, b'A');
        reg.write_byte(b'Z');
        assert_eq!(unsafe { cell_ptr.read_volatile() }, b'Z');
        assert_eq!(reg.addr(), cell_ptr as usize);
    }

    #[test]
    fn test_uart_register_address() {
        let reg = unsafe { MmioRegister::uart() };
        assert_eq!(reg.addr(), 0x1000_0000);
    }

    #[test]
    fn test_write_char_narrows_to_u8() {
        let mut rec = Recorder::new();
        rec.write_char(-1i8 as c_char);
        rec.write_char(b'a' as c_char);
        assert_eq!(rec.writes(), &[0xFF, b'a']);
    }

    #[test]
    fn test_borrowed_device_forwards_writes() {
        fn put<D: CharDevice>(mut device: D, byte: u8) {
            device.write_byte(byte);
        }

        let mut rec = Recorder::new();
        put(&mut rec, b'x');
        put(&mut rec, b'y');
        assert_eq!(rec.writes(), b"xy");
    }
}
