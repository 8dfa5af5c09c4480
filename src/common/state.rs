//! Device States.

use serde::Serialize;

/// State held by a hierarchy node.
///
/// Ranks move between the power states; banks are either closed or hold one
/// open row. In all-banks mode every bank of a rank always shares the same
/// state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum State {
    /// Rank is powered and idle or active.
    PowerUp,
    /// Power-down entered with at least one row open.
    ActPowerDown,
    /// Power-down entered with every bank closed.
    PrePowerDown,
    /// Rank refreshes itself; commands need an exit first.
    SelfRefresh,
    /// No row latched.
    Closed,
    /// A row is latched in the row buffer.
    Opened,
}
