//! Checks the firmware's startup path against `llvm-objdump -d -f` output.
//!
//! The simulator stops at the first SYSTEM-opcode instruction (ECALL, CSR
//! access, WFI, ...), so everything `_start` executes before it calls `main`
//! must stay clear of that opcode.

use thiserror::Error;

/// Major opcode shared by ECALL, EBREAK, WFI, xRET and every CSR instruction.
pub const OPCODE_SYSTEM: u32 = 0x73;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub addr: u32,
    pub word: u32,
    pub text: String,
}

impl Instruction {
    pub fn opcode(&self) -> u32 {
        self.word & 0x7f
    }

    pub fn is_system(&self) -> bool {
        self.opcode() == OPCODE_SYSTEM
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("no `_start` symbol in disassembly")]
    MissingStart,
    #[error("`_start` is at {found:#x}, expected the image base {expected:#x}")]
    MisplacedStart { found: u32, expected: u32 },
    #[error("ELF entry {entry:#x} is not `_start` ({start:#x})")]
    EntryMismatch { entry: u32, start: u32 },
    #[error("`_start` never calls `main`")]
    NoCallToMain,
    #[error("SYSTEM instruction at {addr:#x} runs before `main`: {text}")]
    SystemBeforeMain { addr: u32, text: String },
}

#[derive(Debug, PartialEq, Eq)]
pub struct StartupReport {
    pub start: u32,
    pub call_site: u32,
    /// Instructions executed before the call, the call excluded.
    pub prologue_len: usize,
}

enum Line<'a> {
    Entry(u32),
    Label(u32, &'a str),
    Insn(Instruction),
    Other,
}

fn parse_hex(s: &str) -> Option<u32> {
    let s = s.trim_start_matches("0x");
    u32::from_str_radix(s, 16).ok()
}

fn parse_line(line: &str) -> Line<'_> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix("start address:") {
        return parse_hex(rest.trim()).map_or(Line::Other, Line::Entry);
    }

    // "00000000 <_start>:"
    if let Some(head) = line.strip_suffix(">:") {
        if let Some((addr, name)) = head.split_once(" <") {
            if let Some(addr) = parse_hex(addr) {
                return Line::Label(addr, name);
            }
        }
        return Line::Other;
    }

    // "       8: ef 00 c0 00   jal 0xc <main>"
    let Some((addr, rest)) = line.split_once(':') else {
        return Line::Other;
    };
    let Some(addr) = parse_hex(addr) else {
        return Line::Other;
    };

    let mut bytes = Vec::with_capacity(4);
    let mut tokens = rest.split_whitespace().peekable();
    while let Some(tok) = tokens.peek() {
        if bytes.len() < 4 && tok.len() == 2 && tok.chars().all(|c| c.is_ascii_hexdigit()) {
            bytes.push(u8::from_str_radix(tok, 16).unwrap_or(0));
            tokens.next();
        } else {
            break;
        }
    }

    let word = match bytes.as_slice() {
        [b0, b1, b2, b3] => u32::from_le_bytes([*b0, *b1, *b2, *b3]),
        // Some objdump builds print the word as one big-endian token.
        [] => match tokens.peek().filter(|t| t.len() == 8).and_then(|t| parse_hex(t)) {
            Some(word) => {
                tokens.next();
                word
            }
            None => return Line::Other,
        },
        _ => return Line::Other,
    };

    let text = tokens.collect::<Vec<_>>().join(" ");
    Line::Insn(Instruction { addr, word, text })
}

/// Walk `_start` up to its call into `main` and reject any SYSTEM-opcode
/// instruction on the way. `_start` must sit at `image_base`, and at the ELF
/// entry when the header is part of the dump.
pub fn check(disasm: &str, image_base: u32) -> Result<StartupReport, StartupError> {
    let mut entry = None;
    let mut start = None;
    let mut prologue_len = 0;
    let mut call_site = None;

    for line in disasm.lines() {
        match parse_line(line) {
            Line::Entry(addr) => entry = Some(addr),
            Line::Label(addr, "_start") => start = Some(addr),
            Line::Label(..) if start.is_some() => break,
            Line::Insn(insn) if start.is_some() => {
                if insn.text.contains("<main>") {
                    call_site = Some(insn.addr);
                    break;
                }
                if insn.is_system() {
                    return Err(StartupError::SystemBeforeMain {
                        addr: insn.addr,
                        text: insn.text,
                    });
                }
                prologue_len += 1;
            }
            _ => {}
        }
    }

    let start = start.ok_or(StartupError::MissingStart)?;
    if start != image_base {
        return Err(StartupError::MisplacedStart {
            found: start,
            expected: image_base,
        });
    }
    if let Some(entry) = entry {
        if entry != start {
            return Err(StartupError::EntryMismatch { entry, start });
        }
    }
    let call_site = call_site.ok_or(StartupError::NoCallToMain)?;

    Ok(StartupReport {
        start,
        call_site,
        prologue_len,
    })
}
