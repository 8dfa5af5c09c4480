//! Common types used throughout the DDR4 all-banks model.
//!
//! This module provides the shared vocabulary of the model: hierarchy
//! levels, the command set, device states, request types, addresses and the
//! crate error type.

/// Address type and row identifiers.
pub mod addr;

/// DDR4 command set and command classification.
pub mod command;

/// Memory request types.
pub mod data;

/// Error types.
pub mod error;

/// Hierarchy levels.
pub mod level;

/// Node states.
pub mod state;

pub use addr::{Address, RowId};
pub use command::Command;
pub use data::RequestType;
pub use error::{DramError, Result};
pub use level::Level;
pub use state::State;
