//! Configuration system for the DDR4 all-banks model.
//!
//! This module defines the TOML configuration of a simulation run:
//! 1. **Device:** organization and speed grade names, refresh mode, and the
//!    channel and rank counts patched onto the resolved configuration.
//! 2. **Controller:** page policy, periodic refresh, and the stall limit.
//!
//! Every field has a default, so an empty file selects an 8Gb x8 DDR4-3200
//! device with one channel and one rank.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::Result;
use crate::dram::{Ddr4Ab, RefreshMode};

/// Default configuration constants.
mod defaults {
    /// Organization used when none is configured.
    pub const ORGANIZATION: &str = "DDR4_8Gb_x8";

    /// Speed grade used when none is configured.
    pub const SPEED: &str = "DDR4_3200";

    /// Number of independent channels.
    pub const CHANNELS: usize = 1;

    /// Ranks per channel.
    pub const RANKS: usize = 1;

    /// Cycles a request may wait without issuing anything.
    ///
    /// Comfortably above the longest single constraint (self-refresh exit
    /// plus a refresh cycle) so only a genuinely stuck request trips it.
    pub const MAX_STALL_CYCLES: u64 = 100_000;
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
}

/// Which device to model.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_organization")]
    pub organization: String,

    #[serde(default = "default_speed")]
    pub speed: String,

    #[serde(default)]
    pub refresh_mode: RefreshMode,

    #[serde(default = "default_channels")]
    pub channels: usize,

    #[serde(default = "default_ranks")]
    pub ranks: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            speed: default_speed(),
            refresh_mode: RefreshMode::default(),
            channels: defaults::CHANNELS,
            ranks: defaults::RANKS,
        }
    }
}

/// Row buffer management policy of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PagePolicy {
    /// Leave rows open after an access.
    #[default]
    Open,
    /// Close rows with every access (RDA/WRA).
    #[serde(alias = "Closed", alias = "ClosedAP")]
    ClosedAp,
}

/// Controller behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub page_policy: PagePolicy,

    /// Inject a refresh per rank every nREFI cycles.
    #[serde(default = "default_refresh")]
    pub refresh: bool,

    #[serde(default = "default_max_stall")]
    pub max_stall_cycles: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_policy: PagePolicy::default(),
            refresh: default_refresh(),
            max_stall_cycles: defaults::MAX_STALL_CYCLES,
        }
    }
}

fn default_organization() -> String {
    defaults::ORGANIZATION.to_string()
}

fn default_speed() -> String {
    defaults::SPEED.to_string()
}

fn default_channels() -> usize {
    defaults::CHANNELS
}

fn default_ranks() -> usize {
    defaults::RANKS
}

fn default_refresh() -> bool {
    true
}

fn default_max_stall() -> u64 {
    defaults::MAX_STALL_CYCLES
}

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolves the device section into a configured engine with the
    /// channel and rank counts applied.
    pub fn build_device(&self) -> Result<Ddr4Ab> {
        let mut device = Ddr4Ab::configure(
            &self.device.organization,
            &self.device.speed,
            self.device.refresh_mode,
        )?;
        device.set_channel_number(self.device.channels);
        device.set_rank_number(self.device.ranks);
        Ok(device)
    }
}
