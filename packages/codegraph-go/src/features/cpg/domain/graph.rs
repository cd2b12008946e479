//! Per-file graph arena

use std::ops::Index;

use super::node::{Declaration, Node, NodeId, NodeKind};

/// Owns every node produced by one file's pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next pushed node will receive
    pub fn next_id(&self) -> Option<NodeId> {
        u32::try_from(self.nodes.len()).ok().map(NodeId::new)
    }

    /// Append a node; its `id` must equal [`Graph::next_id`]
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = node.id;
        debug_assert_eq!(Some(id), self.next_id());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Nodes with the given local name
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    /// Nodes with the given category label (`"Variable"`, `"Call"`, ...)
    pub fn find_by_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.label() == label)
    }

    pub fn declarations(&self) -> impl Iterator<Item = (&Node, &Declaration)> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Declaration(d) => Some((n, d)),
            _ => None,
        })
    }

    /// Pre-order walk from `root` along [`Node::children`]
    pub fn walk(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        let mut seen = vec![false; self.nodes.len()];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            order.push(id);
            stack.extend(node.children().into_iter().rev());
        }
        order
    }

    /// Direct parent of every reachable node, indexed by child id
    pub fn parents(&self, root: NodeId) -> Vec<Option<NodeId>> {
        let mut parents = vec![None; self.nodes.len()];
        for id in self.walk(root) {
            if let Some(node) = self.get(id) {
                for child in node.children() {
                    if let Some(slot) = parents.get_mut(child.index()) {
                        slot.get_or_insert(id);
                    }
                }
            }
        }
        parents
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
