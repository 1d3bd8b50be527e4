#![no_std]
#![no_main]

use panic_halt as _;
use rv32_hello_core::MmioRegister;

// Startup: stack at the top of RAM, call `main`, then trap with the status in
// a0 and the exit service number in a7. No CSR access before `main`: the
// simulator halts on any SYSTEM-opcode instruction.
core::arch::global_asm!(
    r#"
    .section .text.start, "ax"
    .global _start
_start:
    la sp, _stack_top
    call main
    li a7, 93
    ecall
1:
    j 1b
"#
);

#[no_mangle]
extern "C" fn main() -> i32 {
    // The simulator bus decodes 0x1000_0000 to the UART data register.
    let mut uart = unsafe { MmioRegister::uart() };

    rv32_hello_core::run(&mut uart)
}
