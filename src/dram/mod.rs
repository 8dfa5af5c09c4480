//! DDR4 All-Banks Device Model.
//!
//! This module ties the parameter resolution and the four per-(level,
//! command) tables together into one engine, [`Ddr4Ab`]. The engine is
//! immutable once configured; all mutable state lives in the
//! [`DeviceTree`] and [`TimingTracker`] handed to it.
//!
//! Two ways in are provided:
//! * Per-cell calls (`resolve_prerequisite`, `is_row_hit`, `is_row_open`,
//!   `apply_completion`, `minimum_delay`) that act on one node.
//! * Address walks (`decode`, `check_row_hit`, `check_row_open`,
//!   `update_state`) that descend from the channel and consult each level's
//!   cell in turn.

/// State update actions.
pub mod actions;

/// Organization geometry.
pub mod org;

/// Prerequisite rules.
pub mod prereq;

/// Row-hit and row-open predicates.
pub mod rowstate;

/// Device configuration and derived parameters.
pub mod spec;

/// Speed grade parameters.
pub mod speed;

/// Secondary parameter lookup tables.
pub mod tables;

/// Timing constraint table.
pub mod timing;

/// Per-node timing history.
pub mod tracker;

/// Device tree arena.
pub mod tree;

use tracing::{info, trace};

use crate::common::{Address, Command, DramError, Level, Result, RowId};

pub use actions::ActionTable;
pub use org::{OrgEntry, Organization};
pub use prereq::PrereqTable;
pub use rowstate::RowPredicateTable;
pub use spec::{DeviceSpec, RefreshMode, CHANNEL_WIDTH, PREFETCH_SIZE, STANDARD_NAME};
pub use speed::{Speed, SpeedEntry};
pub use timing::{Delay, TimingEntry, TimingTable};
pub use tracker::TimingTracker;
pub use tree::{DeviceTree, Node, NodeId};

/// The DDR4 all-banks timing and legality engine.
#[derive(Clone)]
pub struct Ddr4Ab {
    spec: DeviceSpec,
    prereq: PrereqTable,
    rowhit: RowPredicateTable,
    rowopen: RowPredicateTable,
    actions: ActionTable,
    timing: TimingTable,
}

impl Ddr4Ab {
    /// Builds the engine for an already resolved configuration.
    pub fn new(spec: DeviceSpec) -> Self {
        let timing = TimingTable::new(&spec.speed_entry);
        info!(
            standard = STANDARD_NAME,
            org = %spec.org,
            speed = %spec.speed,
            refresh_mode = %spec.refresh_mode,
            "device configured"
        );
        Self {
            spec,
            prereq: PrereqTable::new(),
            rowhit: RowPredicateTable::row_hit(),
            rowopen: RowPredicateTable::row_open(),
            actions: ActionTable::new(),
            timing,
        }
    }

    /// Resolves organization and speed names and builds the engine.
    ///
    /// # Errors
    ///
    /// Fails on unknown names or when the parameter tables have no cell for
    /// the combination.
    pub fn configure(organization: &str, speed: &str, refresh_mode: RefreshMode) -> Result<Self> {
        DeviceSpec::from_names(organization, speed, refresh_mode).map(Self::new)
    }

    /// The resolved configuration.
    pub fn spec(&self) -> &DeviceSpec {
        &self.spec
    }

    /// Sets the channel count used when building trees.
    pub fn set_channel_number(&mut self, channels: usize) {
        self.spec.set_channel_number(channels);
    }

    /// Sets the rank count used when building trees.
    pub fn set_rank_number(&mut self, ranks: usize) {
        self.spec.set_rank_number(ranks);
    }

    /// The timing constraint table.
    pub fn timing(&self) -> &TimingTable {
        &self.timing
    }

    /// Builds a fresh device tree for the current configuration.
    pub fn build_tree(&self) -> Result<DeviceTree> {
        DeviceTree::new(&self.spec)
    }

    /// Resolves `command` against one node.
    ///
    /// Returns `Some(cmd)` when this level decides what to issue, or `None`
    /// when it imposes no prerequisite (including pairs without a rule).
    pub fn resolve_prerequisite(
        &self,
        level: Level,
        command: Command,
        tree: &DeviceTree,
        node: NodeId,
        id: usize,
    ) -> Result<Option<Command>> {
        check_level(tree, node, level)?;
        match self.prereq.get(level, command) {
            Some(rule) => rule(tree, node, command, id),
            None => Ok(None),
        }
    }

    /// Whether `row` is the open row of a bank, for a read or write.
    pub fn is_row_hit(
        &self,
        tree: &DeviceTree,
        node: NodeId,
        command: Command,
        row: RowId,
    ) -> Result<bool> {
        match self.rowhit.get(tree.node(node).level, command) {
            Some(rule) => rule(tree, node, command, row),
            None => Ok(false),
        }
    }

    /// Whether a bank has any row open, for a read or write.
    pub fn is_row_open(&self, tree: &DeviceTree, node: NodeId, command: Command) -> Result<bool> {
        match self.rowopen.get(tree.node(node).level, command) {
            Some(rule) => rule(tree, node, command, 0),
            None => Ok(false),
        }
    }

    /// Applies the completion effect of `command` at one node.
    ///
    /// # Errors
    ///
    /// Fails if `node` is not at `level`.
    pub fn apply_completion(
        &self,
        level: Level,
        command: Command,
        tree: &mut DeviceTree,
        node: NodeId,
        id: usize,
    ) -> Result<()> {
        check_level(tree, node, level)?;
        if let Some(action) = self.actions.get(level, command) {
            action(tree, node, id);
        }
        Ok(())
    }

    /// Binding minimum delays from `issued` to `next` at `level`.
    pub fn minimum_delay(
        &self,
        level: Level,
        issued: Command,
        next: Command,
        sibling: bool,
    ) -> Vec<Delay> {
        self.timing.minimum_delay(level, issued, next, sibling)
    }

    /// The command to issue now so that `command` to `address` makes
    /// progress.
    ///
    /// Walks from the channel down; the first level whose rule names a
    /// command decides. If no level does, `command` itself is legal.
    pub fn decode(&self, tree: &DeviceTree, command: Command, address: &Address) -> Result<Command> {
        let mut node = tree.locate(address, Level::Channel)?;
        loop {
            let level = tree.node(node).level;
            let child_id = level.child().and_then(|l| address.index(l));
            if let Some(rule) = self.prereq.get(level, command) {
                if let Some(cmd) = rule(tree, node, command, child_id.unwrap_or(0))? {
                    return Ok(cmd);
                }
            }
            match child_id.and_then(|i| tree.child(node, i)) {
                Some(child) => node = child,
                None => return Ok(command),
            }
        }
    }

    /// Row-hit walk: the first level with a predicate answers.
    pub fn check_row_hit(&self, tree: &DeviceTree, command: Command, address: &Address) -> Result<bool> {
        self.walk_predicate(&self.rowhit, tree, command, address)
    }

    /// Row-open walk: the first level with a predicate answers.
    pub fn check_row_open(&self, tree: &DeviceTree, command: Command, address: &Address) -> Result<bool> {
        self.walk_predicate(&self.rowopen, tree, command, address)
    }

    fn walk_predicate(
        &self,
        table: &RowPredicateTable,
        tree: &DeviceTree,
        command: Command,
        address: &Address,
    ) -> Result<bool> {
        let mut node = tree.locate(address, Level::Channel)?;
        loop {
            let level = tree.node(node).level;
            let child_id = level.child().and_then(|l| address.index(l));
            if let Some(rule) = table.get(level, command) {
                return rule(tree, node, command, child_id.unwrap_or(0));
            }
            match child_id.and_then(|i| tree.child(node, i)) {
                Some(child) => node = child,
                None => return Ok(false),
            }
        }
    }

    /// Applies `command` along the path to `address`, stopping at the
    /// command's scope level.
    pub fn update_state(&self, tree: &mut DeviceTree, command: Command, address: &Address) -> Result<()> {
        let mut node = tree.locate(address, Level::Channel)?;
        loop {
            let level = tree.node(node).level;
            let child_id = level.child().and_then(|l| address.index(l));
            if let Some(action) = self.actions.get(level, command) {
                trace!(%command, %level, "state action");
                action(tree, node, child_id.unwrap_or(0));
            }
            if level == command.scope() {
                return Ok(());
            }
            match child_id.and_then(|i| tree.child(node, i)) {
                Some(child) => node = child,
                None => return Ok(()),
            }
        }
    }
}

fn check_level(tree: &DeviceTree, node: NodeId, level: Level) -> Result<()> {
    let actual = tree.node(node).level;
    if actual != level {
        return Err(DramError::InvalidHierarchy(format!(
            "{} node addressed as {}",
            actual, level
        )));
    }
    Ok(())
}
