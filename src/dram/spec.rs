//! Device Configuration.
//!
//! Pairs one organization with one speed grade and a refresh mode, and
//! resolves the derived timing parameters from the lookup tables. The result
//! is immutable apart from the channel and rank counts, which the setup code
//! patches in from the configuration before the device tree is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{DramError, Level, Result};
use crate::dram::org::{OrgEntry, Organization};
use crate::dram::speed::{Speed, SpeedEntry};
use crate::dram::tables;

/// Name of the modeled standard.
pub const STANDARD_NAME: &str = "DDR4_AB";

/// DDR4 is an 8n-prefetch architecture.
pub const PREFETCH_SIZE: usize = 8;

/// Width of a DIMM channel in bits.
pub const CHANNEL_WIDTH: usize = 64;

/// Fine-granularity refresh mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefreshMode {
    /// One refresh per nREFI.
    #[default]
    #[serde(rename = "1X")]
    X1,
    /// Twice as many, shorter refreshes.
    #[serde(rename = "2X")]
    X2,
    /// Four times as many, shorter refreshes.
    #[serde(rename = "4X")]
    X4,
}

impl RefreshMode {
    /// All refresh modes in table order.
    pub const ALL: [RefreshMode; 3] = [RefreshMode::X1, RefreshMode::X2, RefreshMode::X4];

    /// Table row, also the shift applied to the refresh interval.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            RefreshMode::X1 => "1X",
            RefreshMode::X2 => "2X",
            RefreshMode::X4 => "4X",
        }
    }
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RefreshMode {
    type Err = DramError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RefreshMode::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DramError::UnknownRefreshMode(s.to_string()))
    }
}

/// A fully resolved DDR4 device configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeviceSpec {
    #[serde(serialize_with = "serialize_name")]
    pub org: Organization,
    #[serde(serialize_with = "serialize_name")]
    pub speed: Speed,
    pub refresh_mode: RefreshMode,
    pub org_entry: OrgEntry,
    pub speed_entry: SpeedEntry,
    /// Cycles from a read command to the last data beat.
    pub read_latency: u64,
}

fn serialize_name<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl DeviceSpec {
    /// Builds a configuration and resolves its derived parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate, density or width has no class in the
    /// parameter tables, or if the selected refresh-cycle cell is missing.
    pub fn new(org: Organization, speed: Speed, refresh_mode: RefreshMode) -> Result<Self> {
        let org_entry = org.entry();
        let mut speed_entry = speed.entry();

        let rate = tables::rate_class(speed_entry.rate, speed_entry.freq)?;
        let density = tables::density_class(org_entry.size_mb)?;
        let rrd_width = tables::rrd_width_class(org_entry.dq)?;
        let faw_width = tables::faw_width_class(org_entry.dq)?;

        speed_entry.n_rrds = tables::RRDS_TABLE[rrd_width][rate];
        speed_entry.n_rrdl = tables::RRDL_TABLE[rrd_width][rate];
        speed_entry.n_faw = tables::FAW_TABLE[faw_width][rate];
        speed_entry.n_rfc = tables::rfc(refresh_mode, density, rate)?;
        speed_entry.n_refi = tables::refi(refresh_mode, rate);
        speed_entry.n_xs = tables::XS_TABLE[density][rate];

        Ok(Self {
            org,
            speed,
            refresh_mode,
            org_entry,
            read_latency: speed_entry.n_cl + speed_entry.n_bl,
            speed_entry,
        })
    }

    /// Builds a configuration from organization and speed names.
    pub fn from_names(org: &str, speed: &str, refresh_mode: RefreshMode) -> Result<Self> {
        Self::new(org.parse()?, speed.parse()?, refresh_mode)
    }

    /// Sets the number of channels.
    pub fn set_channel_number(&mut self, channels: usize) {
        self.org_entry.count[Level::Channel.index()] = channels;
    }

    /// Sets the number of ranks per channel.
    pub fn set_rank_number(&mut self, ranks: usize) {
        self.org_entry.count[Level::Rank.index()] = ranks;
    }

    /// Children per parent at `level`.
    pub fn count(&self, level: Level) -> usize {
        self.org_entry.count(level)
    }
}
