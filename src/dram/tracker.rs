//! Timing Tracker.
//!
//! Scheduler-side bookkeeping for the timing table. Every node keeps, per
//! command, the cycles of its most recent issues and the earliest cycle the
//! command may be issued again. Issuing a command pushes onto the history of
//! each node on its address path and raises the earliest-issue cycles of the
//! commands it constrains; sibling rules raise them on the nodes beside the
//! path instead.

use std::collections::VecDeque;

use crate::common::{Address, Command, Level};
use crate::dram::timing::TimingTable;
use crate::dram::tree::{DeviceTree, NodeId};

#[derive(Clone, Debug)]
struct NodeTiming {
    /// Most recent issue first, capped at the deepest `dist` of the row.
    prev: [VecDeque<u64>; Command::COUNT],
    /// Earliest cycle each command may be issued.
    next: [u64; Command::COUNT],
}

/// Issue history and earliest-issue cycles for every node of a tree.
#[derive(Clone, Debug)]
pub struct TimingTracker {
    nodes: Vec<NodeTiming>,
    depth: [[usize; Command::COUNT]; Level::COUNT],
}

impl TimingTracker {
    /// Creates empty histories for every node of `tree`.
    pub fn new(tree: &DeviceTree, timing: &TimingTable) -> Self {
        let mut depth = [[0; Command::COUNT]; Level::COUNT];
        for level in Level::ALL {
            for cmd in Command::ALL {
                depth[level.index()][cmd.index()] = timing.max_dist(level, cmd);
            }
        }
        let blank = NodeTiming {
            prev: std::array::from_fn(|_| VecDeque::new()),
            next: [0; Command::COUNT],
        };
        Self {
            nodes: vec![blank; tree.len()],
            depth,
        }
    }

    /// Earliest cycle `command` may be issued at `node`.
    pub fn next_issue(&self, node: NodeId, command: Command) -> u64 {
        self.nodes[node.index()].next[command.index()]
    }

    /// Whether `command` may be issued to `address` at cycle `clk`.
    ///
    /// Checks every node from the channel down to the command's scope level.
    pub fn check(&self, tree: &DeviceTree, command: Command, address: &Address, clk: u64) -> bool {
        let Some(&root) = tree.channels().get(address.channel) else {
            return false;
        };
        let mut node = root;
        loop {
            if clk < self.next_issue(node, command) {
                return false;
            }
            let level = tree.node(node).level;
            if level == command.scope() {
                return true;
            }
            if tree.node(node).children.is_empty() {
                return true;
            }
            let Some(i) = level.child().and_then(|l| address.index(l)) else {
                return true;
            };
            // an index past the tree is not a legal target
            match tree.child(node, i) {
                Some(c) => node = c,
                None => return false,
            }
        }
    }

    /// Records `command` issued to `address` at cycle `clk`.
    pub fn update(
        &mut self,
        tree: &DeviceTree,
        timing: &TimingTable,
        command: Command,
        address: &Address,
        clk: u64,
    ) {
        for &root in tree.channels() {
            self.update_node(tree, timing, root, command, address, clk);
        }
    }

    fn update_node(
        &mut self,
        tree: &DeviceTree,
        timing: &TimingTable,
        node: NodeId,
        command: Command,
        address: &Address,
        clk: u64,
    ) {
        let n = tree.node(node);
        let level = n.level;
        let entries = timing.entries(level, command);
        let state = &mut self.nodes[node.index()];

        if address.index(level) != Some(n.id) {
            for e in entries.iter().filter(|e| e.sibling) {
                let slot = &mut state.next[e.cmd.index()];
                *slot = (*slot).max(clk + e.val);
            }
            return;
        }

        let depth = self.depth[level.index()][command.index()];
        if depth > 0 {
            let history = &mut state.prev[command.index()];
            history.push_front(clk);
            history.truncate(depth);
        }
        for e in entries.iter().filter(|e| !e.sibling) {
            let past = e
                .dist
                .checked_sub(1)
                .and_then(|i| state.prev[command.index()].get(i));
            let Some(&past) = past else {
                continue;
            };
            let slot = &mut state.next[e.cmd.index()];
            *slot = (*slot).max(past + e.val);
        }

        for &child in &n.children {
            self.update_node(tree, timing, child, command, address, clk);
        }
    }
}
