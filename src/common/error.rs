//! Error Types.
//!
//! Every failure the model can report is a setup-time or contract violation:
//! an unknown device name, a hole in a parameter table, a node observed in a
//! state its rule does not cover, or a malformed trace. None of them are
//! retried; they propagate to the binary, which aborts the run.

use crate::common::{Command, Level, State};

/// Errors produced while configuring or driving the device model.
#[derive(Debug, thiserror::Error)]
pub enum DramError {
    /// Organization name not in the closed set of DDR4 organizations.
    #[error("unknown organization '{0}'")]
    UnknownOrganization(String),

    /// Speed grade name not in the closed set of DDR4 speed grades.
    #[error("unknown speed grade '{0}'")]
    UnknownSpeed(String),

    /// Refresh mode name other than 1X, 2X or 4X.
    #[error("unknown refresh mode '{0}'")]
    UnknownRefreshMode(String),

    /// Command mnemonic that is not part of the DDR4 command set.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Data rate / clock pair with no column in the parameter tables.
    #[error("no rate class for {rate} MT/s at {freq} MHz")]
    UnsupportedRate {
        /// Data rate in MT/s.
        rate: u32,
        /// Clock frequency in MHz.
        freq: f64,
    },

    /// Device density with no row in the parameter tables.
    #[error("no density class for a {size_mb} Mb device")]
    UnsupportedDensity {
        /// Device size in megabits.
        size_mb: u32,
    },

    /// Data width with no row in the parameter tables.
    #[error("no width class for x{dq} devices")]
    UnsupportedWidth {
        /// Device data width.
        dq: u32,
    },

    /// A table cell exists in shape but carries no data.
    #[error("{table} table has no entry for {detail}")]
    MissingTableEntry {
        /// Name of the parameter table.
        table: &'static str,
        /// Which cell was requested.
        detail: String,
    },

    /// A node was found in a state the rule for this command does not handle.
    #[error("{level} node in state {state:?} cannot take {command}")]
    InvalidState {
        /// Level of the offending node.
        level: Level,
        /// Observed state (`None` for stateless levels).
        state: Option<State>,
        /// Command being resolved.
        command: Command,
    },

    /// Hierarchy shape rejected before the tree was built.
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// Address that points outside the configured tree.
    #[error("address {0} is outside the device")]
    InvalidAddress(String),

    /// Malformed request trace line.
    #[error("trace line {line}: {detail}")]
    Trace {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        detail: String,
    },

    /// A request made no progress for too long.
    #[error("{command} stalled for {cycles} cycles")]
    Stalled {
        /// The command the controller was trying to issue.
        command: Command,
        /// Cycles spent waiting.
        cycles: u64,
    },

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration or trace file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, DramError>;
