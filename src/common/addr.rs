//! Device Addresses.

use std::fmt;

use super::level::Level;

/// Row identifier inside a bank.
pub type RowId = usize;

/// A location in the device hierarchy.
///
/// Channel and rank are always present. Rank-scoped requests such as refresh
/// leave the lower levels empty, which stops hierarchical walks at the rank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Address {
    pub channel: usize,
    pub rank: usize,
    pub bank_group: Option<usize>,
    pub bank: Option<usize>,
    pub row: Option<RowId>,
    pub column: Option<usize>,
}

impl Address {
    /// Address of a whole rank.
    pub fn rank(channel: usize, rank: usize) -> Self {
        Self {
            channel,
            rank,
            ..Self::default()
        }
    }

    /// Address of one column of one bank.
    pub fn column(
        channel: usize,
        rank: usize,
        bank_group: usize,
        bank: usize,
        row: RowId,
        column: usize,
    ) -> Self {
        Self {
            channel,
            rank,
            bank_group: Some(bank_group),
            bank: Some(bank),
            row: Some(row),
            column: Some(column),
        }
    }

    /// Index of this address at `level`, or `None` past its depth.
    pub fn index(&self, level: Level) -> Option<usize> {
        match level {
            Level::Channel => Some(self.channel),
            Level::Rank => Some(self.rank),
            Level::BankGroup => self.bank_group,
            Level::Bank => self.bank,
            Level::Row => self.row,
            Level::Column => self.column,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Level::Channel, self.channel)?;
        write!(f, ".{}{}", Level::Rank, self.rank)?;
        for level in [Level::BankGroup, Level::Bank, Level::Row, Level::Column] {
            match self.index(level) {
                Some(i) => write!(f, ".{}{}", level, i)?,
                None => break,
            }
        }
        Ok(())
    }
}
