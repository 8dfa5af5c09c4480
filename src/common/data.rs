//! Request Types.
//!
//! A request is what the controller is asked to do; the device only
//! understands commands. Each request type has one target command, and the
//! prerequisite resolver fills in whatever must precede it.

use super::command::Command;

/// Kind of memory request served by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// Column read from an open row.
    Read,

    /// Column write to an open row.
    Write,

    /// Rank refresh.
    ///
    /// Requires every bank of the rank to be precharged first.
    Refresh,

    /// Rank power-down entry.
    PowerDown,

    /// Rank self-refresh entry.
    SelfRefresh,
}

impl RequestType {
    /// The command that completes this request.
    pub fn translate(self) -> Command {
        match self {
            RequestType::Read => Command::Rd,
            RequestType::Write => Command::Wr,
            RequestType::Refresh => Command::Ref,
            RequestType::PowerDown => Command::Pde,
            RequestType::SelfRefresh => Command::Sre,
        }
    }
}
