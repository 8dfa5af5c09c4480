//! Device Organizations.
//!
//! Each DDR4 organization is a density and data-width pair. The organization
//! fixes how many bank groups, banks, rows and columns a rank has; channel
//! and rank counts are left at zero and filled in from the configuration.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::common::{DramError, Level};

/// Named DDR4 density/width organization.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Organization {
    Ddr4_2Gb_x4,
    Ddr4_2Gb_x8,
    Ddr4_2Gb_x16,
    Ddr4_4Gb_x4,
    Ddr4_4Gb_x8,
    Ddr4_4Gb_x16,
    Ddr4_8Gb_x4,
    Ddr4_8Gb_x8,
    Ddr4_8Gb_x16,
}

/// Geometry of one organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OrgEntry {
    /// Device density in megabits.
    pub size_mb: u32,
    /// Data pins per device.
    pub dq: u32,
    /// Children per parent at each level, indexed by [`Level::index`].
    pub count: [usize; Level::COUNT],
}

const fn entry(size_gb: u32, dq: u32, bank_groups: usize, rows: usize) -> OrgEntry {
    OrgEntry {
        size_mb: size_gb << 10,
        dq,
        count: [0, 0, bank_groups, 4, rows, 1 << 10],
    }
}

impl Organization {
    /// All organizations in table order.
    pub const ALL: [Organization; 9] = [
        Organization::Ddr4_2Gb_x4,
        Organization::Ddr4_2Gb_x8,
        Organization::Ddr4_2Gb_x16,
        Organization::Ddr4_4Gb_x4,
        Organization::Ddr4_4Gb_x8,
        Organization::Ddr4_4Gb_x16,
        Organization::Ddr4_8Gb_x4,
        Organization::Ddr4_8Gb_x8,
        Organization::Ddr4_8Gb_x16,
    ];

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Organization::Ddr4_2Gb_x4 => "DDR4_2Gb_x4",
            Organization::Ddr4_2Gb_x8 => "DDR4_2Gb_x8",
            Organization::Ddr4_2Gb_x16 => "DDR4_2Gb_x16",
            Organization::Ddr4_4Gb_x4 => "DDR4_4Gb_x4",
            Organization::Ddr4_4Gb_x8 => "DDR4_4Gb_x8",
            Organization::Ddr4_4Gb_x16 => "DDR4_4Gb_x16",
            Organization::Ddr4_8Gb_x4 => "DDR4_8Gb_x4",
            Organization::Ddr4_8Gb_x8 => "DDR4_8Gb_x8",
            Organization::Ddr4_8Gb_x16 => "DDR4_8Gb_x16",
        }
    }

    /// Geometry of this organization.
    pub fn entry(self) -> OrgEntry {
        match self {
            Organization::Ddr4_2Gb_x4 => entry(2, 4, 4, 1 << 15),
            Organization::Ddr4_2Gb_x8 => entry(2, 8, 4, 1 << 14),
            Organization::Ddr4_2Gb_x16 => entry(2, 16, 2, 1 << 14),
            Organization::Ddr4_4Gb_x4 => entry(4, 4, 4, 1 << 16),
            Organization::Ddr4_4Gb_x8 => entry(4, 8, 4, 1 << 15),
            Organization::Ddr4_4Gb_x16 => entry(4, 16, 2, 1 << 15),
            Organization::Ddr4_8Gb_x4 => entry(8, 4, 4, 1 << 17),
            Organization::Ddr4_8Gb_x8 => entry(8, 8, 4, 1 << 16),
            Organization::Ddr4_8Gb_x16 => entry(8, 16, 2, 1 << 16),
        }
    }
}

impl OrgEntry {
    /// Children per parent at `level`.
    pub fn count(&self, level: Level) -> usize {
        self.count[level.index()]
    }

    /// Row buffer size in bytes.
    pub fn page_size(&self) -> usize {
        self.count(Level::Column) * self.dq as usize / 8
    }

    /// Bank groups per rank.
    pub fn bank_groups(&self) -> usize {
        self.count(Level::BankGroup)
    }

    /// Banks per rank, across all bank groups.
    pub fn banks(&self) -> usize {
        self.count(Level::BankGroup) * self.count(Level::Bank)
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Organization {
    type Err = DramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Organization::ALL
            .iter()
            .copied()
            .find(|o| o.name() == s)
            .ok_or_else(|| DramError::UnknownOrganization(s.to_string()))
    }
}
