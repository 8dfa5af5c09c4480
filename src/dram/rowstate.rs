//! Row-State Predicates.
//!
//! Queries a page policy uses to decide whether an access would hit the row
//! buffer. They have no influence on the model's own decisions.

use crate::common::{Command, DramError, Level, Result, State};
use crate::dram::tree::{DeviceTree, NodeId};

/// A row predicate: `(tree, node, command, row)`.
pub type RowFn = fn(&DeviceTree, NodeId, Command, usize) -> Result<bool>;

/// Row predicates indexed by level and command.
#[derive(Clone)]
pub struct RowPredicateTable {
    cells: [[Option<RowFn>; Command::COUNT]; Level::COUNT],
}

impl RowPredicateTable {
    fn empty() -> Self {
        Self {
            cells: [[None; Command::COUNT]; Level::COUNT],
        }
    }

    fn set_access(&mut self, level: Level, rule: RowFn) {
        self.cells[level.index()][Command::Rd.index()] = Some(rule);
        self.cells[level.index()][Command::Wr.index()] = Some(rule);
    }

    /// Row-hit predicates: the requested row is the open one.
    pub fn row_hit() -> Self {
        let mut table = Self::empty();
        table.set_access(Level::Bank, bank_row_hit);
        table
    }

    /// Row-open predicates: some row is open.
    pub fn row_open() -> Self {
        let mut table = Self::empty();
        table.set_access(Level::Bank, bank_row_open);
        table
    }

    /// Predicate for a cell, `None` if the pair is not applicable.
    pub fn get(&self, level: Level, command: Command) -> Option<RowFn> {
        self.cells[level.index()][command.index()]
    }
}

fn bank_row_hit(tree: &DeviceTree, node: NodeId, command: Command, row: usize) -> Result<bool> {
    let bank = tree.node(node);
    match bank.state {
        Some(State::Closed) => Ok(false),
        Some(State::Opened) => Ok(bank.is_row_open(row)),
        state => Err(DramError::InvalidState {
            level: bank.level,
            state,
            command,
        }),
    }
}

fn bank_row_open(tree: &DeviceTree, node: NodeId, command: Command, _row: usize) -> Result<bool> {
    let bank = tree.node(node);
    match bank.state {
        Some(State::Closed) => Ok(false),
        Some(State::Opened) => Ok(true),
        state => Err(DramError::InvalidState {
            level: bank.level,
            state,
            command,
        }),
    }
}
