//! Speed Grades.
//!
//! The primary timing parameters of each DDR4 speed bin, in device clock
//! cycles. The inter-activate, four-activate-window, refresh and
//! self-refresh-exit fields are zero here; they depend on density, width and
//! refresh mode and are filled in by [`crate::dram::DeviceSpec`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::common::DramError;

/// Named DDR4 speed grade.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Speed {
    Ddr4_1600K,
    Ddr4_1600L,
    Ddr4_1866M,
    Ddr4_1866N,
    Ddr4_2133P,
    Ddr4_2133R,
    Ddr4_2400R,
    Ddr4_2400U,
    Ddr4_3200,
    /// 3200-class part clocked at 400 MHz, as used on the co-simulation
    /// board. Occupies its own column in every parameter table.
    Ddr4_400MHz,
}

/// Timing parameters of one speed grade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpeedEntry {
    /// Data rate in MT/s.
    pub rate: u32,
    /// Clock frequency in MHz.
    pub freq: f64,
    /// Clock period in ns.
    pub tck: f64,
    pub n_bl: u64,
    pub n_ccds: u64,
    pub n_ccdl: u64,
    pub n_rtrs: u64,
    pub n_cl: u64,
    pub n_rcd: u64,
    pub n_rp: u64,
    pub n_cwl: u64,
    pub n_ras: u64,
    pub n_rc: u64,
    pub n_rtp: u64,
    pub n_wtrs: u64,
    pub n_wtrl: u64,
    pub n_wr: u64,
    pub n_rrds: u64,
    pub n_rrdl: u64,
    pub n_faw: u64,
    pub n_rfc: u64,
    pub n_refi: u64,
    pub n_pd: u64,
    pub n_xp: u64,
    pub n_ckesr: u64,
    pub n_xs: u64,
}

/// Clock for the JEDEC bins: 400/3 MHz steps.
fn jedec_freq(step: u32) -> (f64, f64) {
    let freq = (400.0 / 3.0) * f64::from(step);
    (freq, 1000.0 / freq)
}

#[allow(clippy::too_many_arguments)]
fn entry(
    rate: u32,
    (freq, tck): (f64, f64),
    n_ccdl: u64,
    n_cl: u64,
    n_cwl: u64,
    n_ras: u64,
    n_rc: u64,
    n_rtp: u64,
    n_wtrs: u64,
    n_wr: u64,
    n_pd: u64,
    n_xp: u64,
    n_ckesr: u64,
) -> SpeedEntry {
    SpeedEntry {
        rate,
        freq,
        tck,
        n_bl: 4,
        n_ccds: 4,
        n_ccdl,
        n_rtrs: 2,
        n_cl,
        n_rcd: n_cl,
        n_rp: n_cl,
        n_cwl,
        n_ras,
        n_rc,
        n_rtp,
        n_wtrs,
        n_wtrl: n_rtp,
        n_wr,
        n_rrds: 0,
        n_rrdl: 0,
        n_faw: 0,
        n_rfc: 0,
        n_refi: 0,
        n_pd,
        n_xp,
        n_ckesr,
        n_xs: 0,
    }
}

impl Speed {
    /// All speed grades in table order.
    pub const ALL: [Speed; 10] = [
        Speed::Ddr4_1600K,
        Speed::Ddr4_1600L,
        Speed::Ddr4_1866M,
        Speed::Ddr4_1866N,
        Speed::Ddr4_2133P,
        Speed::Ddr4_2133R,
        Speed::Ddr4_2400R,
        Speed::Ddr4_2400U,
        Speed::Ddr4_3200,
        Speed::Ddr4_400MHz,
    ];

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Speed::Ddr4_1600K => "DDR4_1600K",
            Speed::Ddr4_1600L => "DDR4_1600L",
            Speed::Ddr4_1866M => "DDR4_1866M",
            Speed::Ddr4_1866N => "DDR4_1866N",
            Speed::Ddr4_2133P => "DDR4_2133P",
            Speed::Ddr4_2133R => "DDR4_2133R",
            Speed::Ddr4_2400R => "DDR4_2400R",
            Speed::Ddr4_2400U => "DDR4_2400U",
            Speed::Ddr4_3200 => "DDR4_3200",
            Speed::Ddr4_400MHz => "DDR4_400MHz",
        }
    }

    /// Primary timing parameters of this grade.
    pub fn entry(self) -> SpeedEntry {
        // After the clock: nCCDL nCL nCWL nRAS nRC nRTP nWTRS nWR nPD nXP nCKESR.
        match self {
            Speed::Ddr4_1600K => entry(1600, jedec_freq(6), 5, 11, 9, 28, 39, 6, 2, 12, 4, 5, 5),
            Speed::Ddr4_1600L => entry(1600, jedec_freq(6), 5, 12, 9, 28, 40, 6, 2, 12, 4, 5, 5),
            Speed::Ddr4_1866M => entry(1866, jedec_freq(7), 5, 13, 10, 32, 45, 7, 3, 14, 5, 6, 6),
            Speed::Ddr4_1866N => entry(1866, jedec_freq(7), 5, 14, 10, 32, 46, 7, 3, 14, 5, 6, 6),
            Speed::Ddr4_2133P => entry(2133, jedec_freq(8), 6, 15, 11, 36, 51, 8, 3, 16, 6, 7, 7),
            Speed::Ddr4_2133R => entry(2133, jedec_freq(8), 6, 16, 11, 36, 52, 8, 3, 16, 6, 7, 7),
            Speed::Ddr4_2400R => entry(2400, jedec_freq(9), 6, 16, 12, 39, 55, 9, 3, 18, 6, 8, 7),
            Speed::Ddr4_2400U => entry(2400, jedec_freq(9), 6, 18, 12, 39, 57, 9, 3, 18, 6, 8, 7),
            Speed::Ddr4_3200 => entry(3200, (1600.0, 0.625), 8, 22, 16, 52, 74, 12, 4, 24, 8, 10, 8),
            Speed::Ddr4_400MHz => entry(3200, (400.0, 2.5), 4, 6, 5, 14, 20, 4, 2, 6, 3, 3, 4),
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Speed {
    type Err = DramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Speed::ALL
            .iter()
            .copied()
            .find(|sp| sp.name() == s)
            .ok_or_else(|| DramError::UnknownSpeed(s.to_string()))
    }
}
