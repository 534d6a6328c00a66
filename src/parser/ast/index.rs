//! Non-owning parent lookup for a parsed tree.

use super::{Node, NodeId};

/// Maps every node of one tree to its parent.
///
/// Built once per tree in a single pass. Node ids are dense pre-order
/// indexes, so both tables are plain vectors.
pub struct ParentIndex<'a> {
    nodes: Vec<&'a Node>,
    parents: Vec<Option<NodeId>>,
}

impl<'a> ParentIndex<'a> {
    pub fn build(root: &'a Node) -> Self {
        let mut index = Self {
            nodes: Vec::new(),
            parents: Vec::new(),
        };
        index.visit(root, None);
        index
    }

    fn visit(&mut self, node: &'a Node, parent: Option<NodeId>) {
        let slot = node.id().index();
        if self.nodes.len() <= slot {
            self.nodes.resize(slot + 1, node);
            self.parents.resize(slot + 1, None);
        }
        self.nodes[slot] = node;
        self.parents[slot] = parent;
        for child in node.children() {
            self.visit(child, Some(node.id()));
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&'a Node> {
        self.nodes.get(id.index()).copied()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().flatten()
    }

    pub fn parent(&self, node: &Node) -> Option<&'a Node> {
        self.parent_of(node.id()).and_then(|id| self.node(id))
    }

    /// Parents of `node` from the nearest up to the root.
    pub fn ancestors(&self, node: &Node) -> impl Iterator<Item = &'a Node> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
