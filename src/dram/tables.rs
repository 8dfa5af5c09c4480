//! Secondary Timing Parameter Tables.
//!
//! Parameters that JEDEC specifies in nanoseconds per density or page size
//! rather than per speed bin, pre-converted to clock cycles for each rate
//! class. Columns are indexed by rate class: 1600, 1866, 2133, 2400,
//! 3200 at 1600 MHz, and 3200-class parts clocked at 400 MHz.

use crate::common::{DramError, Result};
use crate::dram::spec::RefreshMode;

/// Number of rate-class columns in every table.
pub const RATE_CLASSES: usize = 6;

/// Number of density rows (2Gb, 4Gb, 8Gb).
pub const DENSITY_CLASSES: usize = 3;

/// ACT to ACT, different bank group. Rows: x4/x8, x16.
pub const RRDS_TABLE: [[u64; RATE_CLASSES]; 2] = [
    [4, 4, 4, 4, 4, 4],
    [5, 5, 6, 7, 9, 4],
];

/// ACT to ACT, same bank group. Rows: x4/x8, x16.
pub const RRDL_TABLE: [[u64; RATE_CLASSES]; 2] = [
    [5, 5, 6, 6, 8, 4],
    [6, 6, 7, 8, 11, 5],
];

/// Four-activate window. Rows: x4, x8, x16.
pub const FAW_TABLE: [[u64; RATE_CLASSES]; 3] = [
    [16, 16, 16, 16, 16, 16],
    [20, 22, 23, 26, 34, 16],
    [28, 28, 32, 36, 48, 16],
];

/// Refresh cycle time per refresh mode and density.
///
/// The 4X rows for 4Gb and 8Gb only carry five columns in the reference
/// data; the 400 MHz cell is absent rather than zero.
pub const RFC_TABLE: [[[Option<u64>; RATE_CLASSES]; DENSITY_CLASSES]; 3] = [
    [
        [Some(128), Some(150), Some(171), Some(192), Some(256), Some(64)],
        [Some(208), Some(243), Some(278), Some(312), Some(416), Some(104)],
        [Some(280), Some(327), Some(374), Some(420), Some(560), Some(140)],
    ],
    [
        [Some(88), Some(103), Some(118), Some(132), Some(176), Some(44)],
        [Some(128), Some(150), Some(171), Some(192), Some(256), Some(64)],
        [Some(208), Some(243), Some(278), Some(312), Some(416), Some(104)],
    ],
    [
        [Some(72), Some(84), Some(96), Some(108), Some(144), Some(36)],
        [Some(88), Some(103), Some(118), Some(132), Some(33), None],
        [Some(128), Some(150), Some(171), Some(192), Some(48), None],
    ],
];

/// Average refresh interval at 1X refresh.
pub const REFI_TABLE: [u64; RATE_CLASSES] = [6240, 7280, 8320, 9360, 12480, 3120];

/// Self-refresh exit to first valid command, per density.
pub const XS_TABLE: [[u64; RATE_CLASSES]; DENSITY_CLASSES] = [
    [136, 159, 182, 204, 272, 68],
    [216, 252, 288, 324, 432, 108],
    [288, 336, 384, 432, 576, 144],
];

/// Column of a speed grade in the tables.
pub fn rate_class(rate: u32, freq: f64) -> Result<usize> {
    match rate {
        1600 => Ok(0),
        1866 => Ok(1),
        2133 => Ok(2),
        2400 => Ok(3),
        3200 if (freq - 1600.0).abs() < 1e-6 => Ok(4),
        3200 => Ok(5),
        _ => Err(DramError::UnsupportedRate { rate, freq }),
    }
}

/// Row of a device density in the per-density tables.
pub fn density_class(size_mb: u32) -> Result<usize> {
    match size_mb >> 10 {
        2 => Ok(0),
        4 => Ok(1),
        8 => Ok(2),
        _ => Err(DramError::UnsupportedDensity { size_mb }),
    }
}

/// Row of a data width in the two-row RRD tables.
pub fn rrd_width_class(dq: u32) -> Result<usize> {
    match dq {
        4 | 8 => Ok(0),
        16 => Ok(1),
        _ => Err(DramError::UnsupportedWidth { dq }),
    }
}

/// Row of a data width in the three-row FAW table.
pub fn faw_width_class(dq: u32) -> Result<usize> {
    match dq {
        4 => Ok(0),
        8 => Ok(1),
        16 => Ok(2),
        _ => Err(DramError::UnsupportedWidth { dq }),
    }
}

/// Looks up a refresh cycle time, reporting holes in the table.
pub fn rfc(mode: RefreshMode, density: usize, rate: usize) -> Result<u64> {
    RFC_TABLE[mode.ordinal()][density][rate].ok_or_else(|| DramError::MissingTableEntry {
        table: "RFC",
        detail: format!(
            "refresh mode {}, density class {}, rate class {}",
            mode, density, rate
        ),
    })
}

/// Refresh interval, halved for each step of finer refresh granularity.
pub fn refi(mode: RefreshMode, rate: usize) -> u64 {
    REFI_TABLE[rate] >> mode.ordinal()
}
