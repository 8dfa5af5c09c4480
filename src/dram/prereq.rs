//! Prerequisite Resolution.
//!
//! For each (level, command) pair that has a rule, decides which command
//! must actually be issued for the requested one to become legal. Rules look
//! only at node state and the target index; they never mutate anything and
//! never consider timing.
//!
//! A rule returns:
//! * `Some(cmd)` when this level determines the command to issue (possibly
//!   the requested command itself).
//! * `None` when this level imposes nothing and resolution continues one
//!   level down.

use crate::common::{Command, DramError, Level, Result, State};
use crate::dram::tree::{DeviceTree, NodeId};

/// A prerequisite rule: `(tree, node, requested command, target index)`.
pub type PrereqFn = fn(&DeviceTree, NodeId, Command, usize) -> Result<Option<Command>>;

/// Prerequisite rules indexed by level and command.
#[derive(Clone)]
pub struct PrereqTable {
    cells: [[Option<PrereqFn>; Command::COUNT]; Level::COUNT],
}

impl PrereqTable {
    /// Builds the all-banks rule set.
    pub fn new() -> Self {
        let mut table = Self {
            cells: [[None; Command::COUNT]; Level::COUNT],
        };

        table.set(Level::Rank, Command::Rd, rank_access);
        table.set(Level::Bank, Command::Rd, bank_access);
        table.set(Level::Rank, Command::Wr, rank_access);
        table.set(Level::Bank, Command::Wr, bank_access);

        table.set(Level::Rank, Command::Ref, rank_refresh);
        table.set(Level::Rank, Command::Pde, rank_power_down);
        table.set(Level::Rank, Command::Sre, rank_self_refresh);
        table
    }

    fn set(&mut self, level: Level, command: Command, rule: PrereqFn) {
        self.cells[level.index()][command.index()] = Some(rule);
    }

    /// Rule for a cell, `None` if the pair is not applicable.
    pub fn get(&self, level: Level, command: Command) -> Option<PrereqFn> {
        self.cells[level.index()][command.index()]
    }
}

impl Default for PrereqTable {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(tree: &DeviceTree, node: NodeId, command: Command) -> DramError {
    let n = tree.node(node);
    DramError::InvalidState {
        level: n.level,
        state: n.state,
        command,
    }
}

/// Column access at a rank: wake the rank first if it sleeps.
fn rank_access(
    tree: &DeviceTree,
    node: NodeId,
    command: Command,
    _id: usize,
) -> Result<Option<Command>> {
    match tree.node(node).state {
        Some(State::PowerUp) => Ok(None),
        Some(State::ActPowerDown) | Some(State::PrePowerDown) => Ok(Some(Command::Pdx)),
        Some(State::SelfRefresh) => Ok(Some(Command::Srx)),
        _ => Err(invalid(tree, node, command)),
    }
}

/// Column access at a bank: open the row, or close the wrong one.
fn bank_access(
    tree: &DeviceTree,
    node: NodeId,
    command: Command,
    row: usize,
) -> Result<Option<Command>> {
    let bank = tree.node(node);
    match bank.state {
        Some(State::Closed) => Ok(Some(Command::Act)),
        Some(State::Opened) if bank.is_row_open(row) => Ok(Some(command)),
        Some(State::Opened) => Ok(Some(Command::Pre)),
        _ => Err(invalid(tree, node, command)),
    }
}

/// Refresh needs every bank of the rank precharged.
fn rank_refresh(
    tree: &DeviceTree,
    node: NodeId,
    _command: Command,
    _id: usize,
) -> Result<Option<Command>> {
    if tree.any_bank_open(node) {
        Ok(Some(Command::Prea))
    } else {
        Ok(Some(Command::Ref))
    }
}

fn rank_power_down(
    tree: &DeviceTree,
    node: NodeId,
    command: Command,
    _id: usize,
) -> Result<Option<Command>> {
    match tree.node(node).state {
        Some(State::PowerUp) | Some(State::ActPowerDown) | Some(State::PrePowerDown) => {
            Ok(Some(Command::Pde))
        }
        Some(State::SelfRefresh) => Ok(Some(Command::Srx)),
        _ => Err(invalid(tree, node, command)),
    }
}

fn rank_self_refresh(
    tree: &DeviceTree,
    node: NodeId,
    command: Command,
    _id: usize,
) -> Result<Option<Command>> {
    match tree.node(node).state {
        Some(State::PowerUp) | Some(State::SelfRefresh) => Ok(Some(Command::Sre)),
        Some(State::ActPowerDown) | Some(State::PrePowerDown) => Ok(Some(Command::Pdx)),
        _ => Err(invalid(tree, node, command)),
    }
}
