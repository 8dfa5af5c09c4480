//! Hierarchy Levels.
//!
//! A DDR4 device is addressed as a tree: channel, rank, bank group, bank,
//! then row and column inside a bank. Rows and columns are not tree nodes;
//! they only appear as indices passed to the bank-level rules.

use std::fmt;

/// One level of the device hierarchy, ordered from the root down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// Independent command/data bus.
    Channel,
    /// Set of bank groups sharing a bus; one power and refresh domain.
    Rank,
    /// Group of banks sharing local I/O.
    BankGroup,
    /// Bank with its own row buffer.
    Bank,
    /// Row inside a bank.
    Row,
    /// Column inside a row.
    Column,
}

impl Level {
    /// Number of levels.
    pub const COUNT: usize = 6;

    /// All levels, root first.
    pub const ALL: [Level; Level::COUNT] = [
        Level::Channel,
        Level::Rank,
        Level::BankGroup,
        Level::Bank,
        Level::Row,
        Level::Column,
    ];

    /// Position of this level in [`Level::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Level::Channel => "Ch",
            Level::Rank => "Ra",
            Level::BankGroup => "Bg",
            Level::Bank => "Ba",
            Level::Row => "Ro",
            Level::Column => "Co",
        }
    }

    /// The level directly below this one, if any.
    pub fn child(self) -> Option<Level> {
        Level::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
