mod startup;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

const FIRMWARE_TARGET: &str = "riscv32i-unknown-none-elf";
const FIRMWARE_BIN: &str = "rv32-hello-firmware";
// Simulator RAM base; the ELF runner starts at the entry, which must be here.
const IMAGE_BASE: u32 = 0x0000_0000;

#[derive(Parser, Debug)]
#[command(author, version, about = "RV32 Hello build tasks", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Build the firmware and verify nothing before `main` halts the simulator
    CheckStartup {
        /// Check this ELF instead of building the firmware
        #[arg(long)]
        elf: Option<PathBuf>,

        /// Disassembler to run
        #[arg(long, default_value = "llvm-objdump")]
        objdump: String,
    },
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn build_firmware(root: &Path) -> anyhow::Result<PathBuf> {
    let firmware_dir = root.join("crates/firmware");
    info!("Building firmware in {:?}", firmware_dir);

    // Run from the crate dir so its .cargo/config.toml selects the target.
    let status = Command::new(env!("CARGO"))
        .args(["build", "--release", "--target", FIRMWARE_TARGET])
        .current_dir(&firmware_dir)
        .status()
        .context("Failed to run cargo")?;
    if !status.success() {
        bail!("Firmware build failed: {}", status);
    }

    Ok(root
        .join("target")
        .join(FIRMWARE_TARGET)
        .join("release")
        .join(FIRMWARE_BIN))
}

fn check_startup(elf: &Path, objdump: &str) -> anyhow::Result<()> {
    info!("Disassembling {:?}", elf);
    let output = Command::new(objdump)
        .arg("-d")
        .arg("-f")
        .arg(elf)
        .output()
        .with_context(|| format!("Failed to run {}", objdump))?;
    if !output.status.success() {
        bail!(
            "{} failed: {}",
            objdump,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let disasm = String::from_utf8_lossy(&output.stdout);
    let report = startup::check(&disasm, IMAGE_BASE)
        .with_context(|| format!("Startup check failed for {:?}", elf))?;

    info!(
        "_start at {:#x} calls main at {:#x} after {} instructions, no SYSTEM opcodes",
        report.start, report.call_site, report.prologue_len
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    match args.command {
        Cmd::CheckStartup { elf, objdump } => {
            let elf = match elf {
                Some(elf) => elf,
                None => build_firmware(&workspace_root())?,
            };
            check_startup(&elf, &objdump)
        }
    }
}
