//! Device Tree.
//!
//! The hierarchy of channels, ranks, bank groups and banks, stored as an
//! arena. Parents list their children by id and every child keeps a plain
//! id back to its parent, so walking up from a bank to its rank never needs
//! shared ownership. Rows and columns are not nodes: a bank records which
//! row is open in its `row_state` map.

use std::collections::HashMap;

use tracing::debug;

use crate::common::{Address, DramError, Level, Result, RowId, State};
use crate::dram::spec::DeviceSpec;

/// Index of a node in a [`DeviceTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One element of the device hierarchy.
#[derive(Clone, Debug)]
pub struct Node {
    pub level: Level,
    /// Position among its siblings.
    pub id: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// `None` for levels that carry no state (channels, bank groups).
    pub state: Option<State>,
    /// Open rows of a bank. Empty or a single entry in all-banks mode.
    pub row_state: HashMap<RowId, State>,
}

impl Node {
    /// Whether `row` is currently latched in this bank.
    pub fn is_row_open(&self, row: RowId) -> bool {
        self.row_state.contains_key(&row)
    }
}

/// State each level starts in after power-up.
fn start_state(level: Level) -> Option<State> {
    match level {
        Level::Rank => Some(State::PowerUp),
        Level::Bank => Some(State::Closed),
        _ => None,
    }
}

/// Arena holding every node of the configured channels.
#[derive(Clone, Debug)]
pub struct DeviceTree {
    nodes: Vec<Node>,
    channels: Vec<NodeId>,
}

impl DeviceTree {
    /// Builds the tree for the channel and rank counts set on `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`DramError::InvalidHierarchy`] if any level down to the bank
    /// has a zero count.
    pub fn new(spec: &DeviceSpec) -> Result<Self> {
        for level in [Level::Channel, Level::Rank, Level::BankGroup, Level::Bank] {
            if spec.count(level) == 0 {
                return Err(DramError::InvalidHierarchy(format!(
                    "{} count is zero",
                    level
                )));
            }
        }

        let mut tree = Self {
            nodes: Vec::new(),
            channels: Vec::new(),
        };
        for ch in 0..spec.count(Level::Channel) {
            let root = tree.build(spec, Level::Channel, ch, None);
            tree.channels.push(root);
        }
        debug!(
            nodes = tree.nodes.len(),
            channels = tree.channels.len(),
            "device tree built"
        );
        Ok(tree)
    }

    fn build(
        &mut self,
        spec: &DeviceSpec,
        level: Level,
        id: usize,
        parent: Option<NodeId>,
    ) -> NodeId {
        let node_id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            level,
            id,
            parent,
            children: Vec::new(),
            state: start_state(level),
            row_state: HashMap::new(),
        });

        if level != Level::Bank {
            if let Some(child_level) = level.child() {
                let children: Vec<NodeId> = (0..spec.count(child_level))
                    .map(|i| self.build(spec, child_level, i, Some(node_id)))
                    .collect();
                self.nodes[node_id.0].children = children;
            }
        }
        node_id
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrows a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutably borrows a node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Root nodes, one per channel.
    pub fn channels(&self) -> &[NodeId] {
        &self.channels
    }

    /// Parent of a node, `None` for channels.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Child of `id` at position `index`.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[id.0].children.get(index).copied()
    }

    /// Finds the node `address` names at `level`.
    ///
    /// # Errors
    ///
    /// Returns [`DramError::InvalidAddress`] if an index is missing or out of
    /// range on the way down.
    pub fn locate(&self, address: &Address, level: Level) -> Result<NodeId> {
        let invalid = || DramError::InvalidAddress(address.to_string());
        let mut node = *self.channels.get(address.channel).ok_or_else(invalid)?;
        for next in [Level::Rank, Level::BankGroup, Level::Bank] {
            if next > level {
                break;
            }
            let index = address.index(next).ok_or_else(invalid)?;
            node = self.child(node, index).ok_or_else(invalid)?;
        }
        Ok(node)
    }

    /// Rank node `rank` of channel `channel`.
    pub fn rank(&self, channel: usize, rank: usize) -> Option<NodeId> {
        self.channels
            .get(channel)
            .and_then(|&ch| self.child(ch, rank))
    }

    /// Every rank of every channel.
    pub fn ranks(&self) -> Vec<NodeId> {
        self.channels
            .iter()
            .flat_map(|&ch| self.nodes[ch.0].children.iter().copied())
            .collect()
    }

    /// The rank a bank belongs to: its parent's parent.
    pub fn rank_of_bank(&self, bank: NodeId) -> Option<NodeId> {
        self.parent(bank).and_then(|bg| self.parent(bg))
    }

    /// Every bank under every bank group of `rank`.
    pub fn banks_of_rank(&self, rank: NodeId) -> Vec<NodeId> {
        self.nodes[rank.0]
            .children
            .iter()
            .flat_map(|&bg| self.nodes[bg.0].children.iter().copied())
            .collect()
    }

    /// Whether any bank of `rank` has a row open.
    pub fn any_bank_open(&self, rank: NodeId) -> bool {
        self.banks_of_rank(rank)
            .into_iter()
            .any(|bank| self.nodes[bank.0].state != Some(State::Closed))
    }
}
