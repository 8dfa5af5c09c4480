//! DDR4 All-Banks Device Model Library.
//!
//! This crate implements the timing and legality engine of a DDR4 device
//! operated in all-banks mode, where every bank of a rank is activated and
//! precharged together. Given a device tree and an address, the engine
//! answers which command must be issued next, whether an access would hit an
//! open row, how node state changes when a command completes, and how long
//! the scheduler must wait before the next command.
//!
//! # Architecture
//!
//! * **Parameters**: organization and speed grade tables, resolved into one
//!   device configuration.
//! * **Engine**: per (level, command) prerequisite, row-state, action and
//!   timing tables.
//! * **Simulation**: a timing tracker, an in-order controller and a trace
//!   loader driving the engine cycle by cycle.
//!
//! # Modules
//!
//! * `common`: Shared vocabulary types and error handling.
//! * `config`: Configuration loading and parsing.
//! * `dram`: The device model and its tables.
//! * `sim`: Controller and trace loading.
//! * `stats`: Statistics collection.

/// Shared vocabulary: levels, commands, states, addresses and errors.
pub mod common;

/// Configuration system for device selection and controller behavior.
///
/// Loads TOML files and resolves them into a configured device.
pub mod config;

/// DDR4 all-banks device model.
///
/// Parameter resolution, the device tree, the four dispatch tables and the
/// timing tracker.
pub mod dram;

/// Simulation harness: request traces and the in-order controller.
pub mod sim;

/// Statistics collection and reporting.
pub mod stats;
