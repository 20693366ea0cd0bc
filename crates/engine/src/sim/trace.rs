//! Access Trace Reader.
//!
//! This module parses plain-text access traces for replay. It performs:
//! 1. **Line parsing:** One access per line as `<op> <addr>`, where `op` is
//!    `R` (read), `W` (write) or `I` (invalidate), case-insensitive.
//! 2. **Address parsing:** Hexadecimal with a `0x` prefix, or decimal.
//! 3. **Filtering:** Blank lines and `#` comments (whole-line or trailing) are skipped.
//!
//! ```text
//! # warm up
//! R 0x1000
//! W 0x1040   # dirty the second line
//! I 4096
//! ```

use std::fs;
use std::path::Path;

use crate::common::TraceError;

/// Kind of trace access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    /// Demand read.
    Read,
    /// Demand write; dirties the line.
    Write,
    /// Explicit removal of the line.
    Invalidate,
}

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Access kind.
    pub kind: AccessKind,
    /// Byte address.
    pub addr: u64,
}

/// Parses a whole trace.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] naming the first malformed line.
pub fn parse_trace(text: &str) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        records.push(parse_line(line).map_err(|reason| TraceError::Parse {
            line: idx + 1,
            reason,
        })?);
    }
    Ok(records)
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read, or
/// [`TraceError::Parse`] for the first malformed line.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, TraceError> {
    let text = fs::read_to_string(path)?;
    parse_trace(&text)
}

fn parse_line(line: &str) -> Result<TraceRecord, String> {
    let mut fields = line.split_whitespace();
    let op = fields.next().ok_or_else(|| "missing operation".to_string())?;
    let addr = fields
        .next()
        .ok_or_else(|| format!("missing address after '{op}'"))?;
    if let Some(extra) = fields.next() {
        return Err(format!("unexpected field '{extra}'"));
    }

    let kind = match op.to_ascii_uppercase().as_str() {
        "R" => AccessKind::Read,
        "W" => AccessKind::Write,
        "I" => AccessKind::Invalidate,
        _ => return Err(format!("unknown operation '{op}'")),
    };
    let addr = parse_addr(addr).ok_or_else(|| format!("invalid address '{addr}'"))?;
    Ok(TraceRecord { kind, addr })
}

fn parse_addr(text: &str) -> Option<u64> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => text.replace('_', "").parse().ok(),
    }
}
