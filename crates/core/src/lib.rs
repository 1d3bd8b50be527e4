//! Greeting output for a bare-metal RV32 target.
//!
//! The program writes a fixed, sentinel-terminated message one byte at a time
//! to a memory-mapped UART data register and hands a status back to whatever
//! startup code called it. Hardware access goes through [`CharDevice`], so the
//! same sequence runs against the real register on target and against an
//! in-memory recorder on the host.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(any(test, feature = "std"))]
pub mod console;
pub mod device;
pub mod emitter;
#[cfg(any(test, feature = "std"))]
pub mod testing;


pub use device::{CharDevice, MmioRegister, UART_BASE};
pub use emitter::{emit, Emitter, GREETING};

/// Status returned to the startup code after the greeting has been written.
pub const EXIT_SUCCESS: i32 = 0;

/// Program entry sequence: write [`GREETING`] to `device` and return the
/// completion status.
///
/// The status is passed through to the caller untouched; what it means for
/// process exit is up to the startup code.
pub fn run<D: CharDevice + ?Sized>(device: &mut D) -> i32 {
    emit(device, GREETING);
    EXIT_SUCCESS
}
