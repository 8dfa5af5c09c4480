//! Simulation harness.
//!
//! Drives the device model with a request stream:
//! * `loader` parses plain-text request traces.
//! * `controller` serves requests in order, resolving prerequisites,
//!   honoring timing constraints and injecting periodic refreshes.

/// In-order request controller.
pub mod controller;

/// Request trace loader.
pub mod loader;

use crate::common::{Address, RequestType};

pub use controller::Controller;
pub use loader::{load_trace, parse_trace};

/// One memory request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    pub kind: RequestType,
    pub addr: Address,
}

impl Request {
    /// Creates a request.
    pub fn new(kind: RequestType, addr: Address) -> Self {
        Self { kind, addr }
    }
}
