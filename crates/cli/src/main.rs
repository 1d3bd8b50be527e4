use anyhow::Context;
use clap::Parser;
use rv32_hello_core::console::{LineBuffered, Unbuffered};
use rv32_hello_core::CharDevice;
use std::io;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "RV32 Hello host runner", long_about = None)]
struct Args {
    /// Hold device output until each line feed, like the simulator console
    #[arg(short, long)]
    line_buffered: bool,

    /// Log every byte written to the device as hex
    #[arg(long)]
    hex: bool,

    /// Enable debug-level logging
    #[arg(short, long)]
    trace: bool,
}

/// Logs each write before handing it to the wrapped device.
struct HexLog<D> {
    inner: D,
    count: usize,
}

impl<D: CharDevice> CharDevice for HexLog<D> {
    fn write_byte(&mut self, byte: u8) {
        info!("write #{:<3} {:#04x} {:?}", self.count, byte, byte as char);
        self.count += 1;
        self.inner.write_byte(byte);
    }
}

fn run_on<D: CharDevice>(device: D, hex: bool) -> (i32, D) {
    if hex {
        let mut logged = HexLog {
            inner: device,
            count: 0,
        };
        let status = rv32_hello_core::run(&mut logged);
        debug!("{} bytes written", logged.count);
        (status, logged.inner)
    } else {
        let mut device = device;
        let status = rv32_hello_core::run(&mut device);
        (status, device)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Device output owns stdout, logs go to stderr.
    if args.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(io::stderr)
            .init();
    }

    info!(
        "Running entry sequence ({} console)",
        if args.line_buffered { "line-buffered" } else { "unbuffered" }
    );

    let status = if args.line_buffered {
        let (status, mut console) = run_on(LineBuffered::new(io::stdout()), args.hex);
        console.flush_pending();
        if let Some(e) = console.take_error() {
            return Err(e).context("Failed to write device output to stdout");
        }
        status
    } else {
        let (status, mut console) = run_on(Unbuffered::new(io::stdout()), args.hex);
        if let Some(e) = console.take_error() {
            return Err(e).context("Failed to write device output to stdout");
        }
        status
    };

    info!("Entry returned status {}", status);

    if status != rv32_hello_core::EXIT_SUCCESS {
        std::process::exit(status);
    }
    Ok(())
}
