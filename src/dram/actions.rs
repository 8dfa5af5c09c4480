//! State Update Actions.
//!
//! Side effects applied when a command completes. In all-banks mode a
//! bank-level ACT or PRE is electrically a whole-rank operation, so those
//! actions climb to the enclosing rank and update every bank under it.
//!
//! Actions do not check preconditions; the prerequisite resolver only lets a
//! command through in states where its effect is defined.

use tracing::trace;

use crate::common::{Command, Level, State};
use crate::dram::tree::{DeviceTree, NodeId};

/// A state action: `(tree, node, target index)`.
pub type ActionFn = fn(&mut DeviceTree, NodeId, usize);

/// State actions indexed by level and command.
#[derive(Clone)]
pub struct ActionTable {
    cells: [[Option<ActionFn>; Command::COUNT]; Level::COUNT],
}

impl ActionTable {
    /// Builds the all-banks action set.
    pub fn new() -> Self {
        let mut table = Self {
            cells: [[None; Command::COUNT]; Level::COUNT],
        };

        table.set(Level::Bank, Command::Act, open_rank_rows);
        table.set(Level::Bank, Command::Pre, close_bank_rank);
        table.set(Level::Rank, Command::Prea, close_rank);
        table.set(Level::Rank, Command::Ref, no_effect);
        table.set(Level::Bank, Command::Rd, no_effect);
        table.set(Level::Bank, Command::Wr, no_effect);
        table.set(Level::Bank, Command::Rda, close_bank_rank);
        table.set(Level::Bank, Command::Wra, close_bank_rank);
        table.set(Level::Rank, Command::Pde, power_down);
        table.set(Level::Rank, Command::Pdx, power_up);
        table.set(Level::Rank, Command::Sre, self_refresh);
        table.set(Level::Rank, Command::Srx, power_up);
        table
    }

    fn set(&mut self, level: Level, command: Command, action: ActionFn) {
        self.cells[level.index()][command.index()] = Some(action);
    }

    /// Action for a cell, `None` if the pair is not applicable.
    pub fn get(&self, level: Level, command: Command) -> Option<ActionFn> {
        self.cells[level.index()][command.index()]
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new()
    }
}

fn no_effect(_tree: &mut DeviceTree, _node: NodeId, _id: usize) {}

/// ACT: latch `row` in every bank of every bank group of the rank.
fn open_rank_rows(tree: &mut DeviceTree, bank: NodeId, row: usize) {
    let Some(rank) = tree.rank_of_bank(bank) else {
        return;
    };
    for b in tree.banks_of_rank(rank) {
        let node = tree.node_mut(b);
        node.state = Some(State::Opened);
        node.row_state.clear();
        node.row_state.insert(row, State::Opened);
    }
    trace!(rank = rank.index(), row, "rank rows opened");
}

/// PRE, RDA, WRA: close every bank of the rank enclosing `bank`.
fn close_bank_rank(tree: &mut DeviceTree, bank: NodeId, _id: usize) {
    if let Some(rank) = tree.rank_of_bank(bank) {
        close_rank(tree, rank, 0);
    }
}

/// PREA: close every bank of `rank`.
fn close_rank(tree: &mut DeviceTree, rank: NodeId, _id: usize) {
    for b in tree.banks_of_rank(rank) {
        let node = tree.node_mut(b);
        node.state = Some(State::Closed);
        node.row_state.clear();
    }
    trace!(rank = rank.index(), "rank rows closed");
}

fn power_down(tree: &mut DeviceTree, rank: NodeId, _id: usize) {
    let state = if tree.any_bank_open(rank) {
        State::ActPowerDown
    } else {
        State::PrePowerDown
    };
    tree.node_mut(rank).state = Some(state);
}

fn power_up(tree: &mut DeviceTree, rank: NodeId, _id: usize) {
    tree.node_mut(rank).state = Some(State::PowerUp);
}

fn self_refresh(tree: &mut DeviceTree, rank: NodeId, _id: usize) {
    tree.node_mut(rank).state = Some(State::SelfRefresh);
}
