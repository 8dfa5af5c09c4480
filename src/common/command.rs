//! DDR4 Command Set.
//!
//! The commands a controller may put on the command bus, together with the
//! level each one addresses and the coarse classification the scheduler
//! uses for bookkeeping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DramError;
use super::level::Level;

/// A DDR4 device command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Command {
    /// Activate: latch a row into the row buffer.
    #[serde(rename = "ACT")]
    Act,
    /// Precharge: close the open row.
    #[serde(rename = "PRE")]
    Pre,
    /// Precharge every bank of a rank.
    #[serde(rename = "PREA")]
    Prea,
    /// Column read.
    #[serde(rename = "RD")]
    Rd,
    /// Column write.
    #[serde(rename = "WR")]
    Wr,
    /// Column read with auto-precharge.
    #[serde(rename = "RDA")]
    Rda,
    /// Column write with auto-precharge.
    #[serde(rename = "WRA")]
    Wra,
    /// Refresh.
    #[serde(rename = "REF")]
    Ref,
    /// Power-down entry.
    #[serde(rename = "PDE")]
    Pde,
    /// Power-down exit.
    #[serde(rename = "PDX")]
    Pdx,
    /// Self-refresh entry.
    #[serde(rename = "SRE")]
    Sre,
    /// Self-refresh exit.
    #[serde(rename = "SRX")]
    Srx,
}

impl Command {
    /// Number of commands.
    pub const COUNT: usize = 12;

    /// All commands in table order.
    pub const ALL: [Command; Command::COUNT] = [
        Command::Act,
        Command::Pre,
        Command::Prea,
        Command::Rd,
        Command::Wr,
        Command::Rda,
        Command::Wra,
        Command::Ref,
        Command::Pde,
        Command::Pdx,
        Command::Sre,
        Command::Srx,
    ];

    /// Position of this command in [`Command::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bus mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            Command::Act => "ACT",
            Command::Pre => "PRE",
            Command::Prea => "PREA",
            Command::Rd => "RD",
            Command::Wr => "WR",
            Command::Rda => "RDA",
            Command::Wra => "WRA",
            Command::Ref => "REF",
            Command::Pde => "PDE",
            Command::Pdx => "PDX",
            Command::Sre => "SRE",
            Command::Srx => "SRX",
        }
    }

    /// Deepest hierarchy level the command addresses.
    ///
    /// State and timing walks stop once they reach this level.
    pub fn scope(self) -> Level {
        match self {
            Command::Act => Level::Row,
            Command::Pre => Level::Bank,
            Command::Rd | Command::Wr | Command::Rda | Command::Wra => Level::Column,
            Command::Prea
            | Command::Ref
            | Command::Pde
            | Command::Pdx
            | Command::Sre
            | Command::Srx => Level::Rank,
        }
    }

    /// Whether the command opens a row.
    pub fn is_opening(self) -> bool {
        matches!(self, Command::Act)
    }

    /// Whether the command transfers data.
    pub fn is_accessing(self) -> bool {
        matches!(
            self,
            Command::Rd | Command::Wr | Command::Rda | Command::Wra
        )
    }

    /// Whether the command closes rows.
    pub fn is_closing(self) -> bool {
        matches!(
            self,
            Command::Rda | Command::Wra | Command::Pre | Command::Prea
        )
    }

    /// Whether the command refreshes.
    pub fn is_refreshing(self) -> bool {
        matches!(self, Command::Ref)
    }

    /// The auto-precharge form of a column access; other commands map to
    /// themselves.
    pub fn with_auto_precharge(self) -> Command {
        match self {
            Command::Rd => Command::Rda,
            Command::Wr => Command::Wra,
            other => other,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = DramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DramError::UnknownCommand(s.to_string()))
    }
}
