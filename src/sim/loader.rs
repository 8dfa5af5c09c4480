//! Request Trace Loader.
//!
//! Traces hold one request per line:
//!
//! ```text
//! # kind ch ra bg ba row col
//! R   0 0 1 2 5 16
//! W   0 0 0 0 5 17
//! REF 0 0
//! PD  0 1
//! SR  0 1
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Every index is
//! checked against the configured geometry.

use std::fs;
use std::path::Path;

use crate::common::{Address, DramError, Level, RequestType, Result};
use crate::dram::DeviceSpec;
use crate::sim::Request;

/// Reads and parses a trace file.
pub fn load_trace(path: impl AsRef<Path>, spec: &DeviceSpec) -> Result<Vec<Request>> {
    let content = fs::read_to_string(path)?;
    parse_trace(&content, spec)
}

/// Parses trace text.
pub fn parse_trace(content: &str, spec: &DeviceSpec) -> Result<Vec<Request>> {
    let mut requests = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        requests.push(parse_line(line, i + 1, spec)?);
    }
    Ok(requests)
}

fn parse_line(line: &str, line_no: usize, spec: &DeviceSpec) -> Result<Request> {
    let err = |detail: String| DramError::Trace {
        line: line_no,
        detail,
    };

    let mut fields = line.split_whitespace();
    let kind = match fields.next() {
        Some("R") | Some("READ") => RequestType::Read,
        Some("W") | Some("WRITE") => RequestType::Write,
        Some("REF") => RequestType::Refresh,
        Some("PD") => RequestType::PowerDown,
        Some("SR") => RequestType::SelfRefresh,
        Some(other) => return Err(err(format!("unknown request kind '{}'", other))),
        None => return Err(err("empty request".to_string())),
    };

    let indices = fields
        .map(|f| {
            f.parse::<usize>()
                .map_err(|_| err(format!("'{}' is not an index", f)))
        })
        .collect::<Result<Vec<usize>>>()?;

    let levels: &[Level] = match kind {
        RequestType::Read | RequestType::Write => &Level::ALL,
        _ => &[Level::Channel, Level::Rank],
    };
    if indices.len() != levels.len() {
        return Err(err(format!(
            "expected {} indices, found {}",
            levels.len(),
            indices.len()
        )));
    }
    for (&level, &index) in levels.iter().zip(&indices) {
        if index >= spec.count(level) {
            return Err(err(format!(
                "{} index {} out of range (count {})",
                level,
                index,
                spec.count(level)
            )));
        }
    }

    let addr = match kind {
        RequestType::Read | RequestType::Write => Address::column(
            indices[0], indices[1], indices[2], indices[3], indices[4], indices[5],
        ),
        _ => Address::rank(indices[0], indices[1]),
    };
    Ok(Request::new(kind, addr))
}
