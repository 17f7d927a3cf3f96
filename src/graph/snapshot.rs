use super::node::{Node, NodeId};
use crate::error::GraphError;

/// A directed connection from one node's output port to another node's input
/// port. Edges have no identity beyond this tuple; fan-in and fan-out are
/// both allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub from_port: usize,
    pub to: NodeId,
    pub to_port: usize,
}

/// The complete in-memory graph at a point in time: all nodes and all edges,
/// owned exclusively by the editing session.
///
/// Nodes iterate in insertion order. Invariant: every edge's endpoints
/// reference nodes currently in the snapshot — `connect` validates both ends
/// and `remove_node` drops the edges that touch the removed node, so dangling
/// edges can never be observed or persisted.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Adds a node and returns its identity.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id().clone();
        self.nodes.push(node);
        id
    }

    /// Removes a node together with every edge that touches it. Returns
    /// whether the node was present.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id() != id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges.retain(|edge| &edge.from != id && &edge.to != id);
        true
    }

    /// Connects `from`'s output port to `to`'s input port.
    ///
    /// Both endpoints must be present and the port indices in range; a
    /// connection that already exists is a no-op success, so restores stay
    /// idempotent.
    pub fn connect(
        &mut self,
        from: &NodeId,
        from_port: usize,
        to: &NodeId,
        to_port: usize,
    ) -> Result<(), GraphError> {
        let from_node = self
            .node(from)
            .ok_or_else(|| GraphError::UnknownNode(from.to_string()))?;
        if from_port >= from_node.output_ports().len() {
            return Err(GraphError::PortOutOfRange {
                node_id: from.to_string(),
                direction: "output",
                index: from_port,
            });
        }
        let to_node = self
            .node(to)
            .ok_or_else(|| GraphError::UnknownNode(to.to_string()))?;
        if to_port >= to_node.input_ports().len() {
            return Err(GraphError::PortOutOfRange {
                node_id: to.to_string(),
                direction: "input",
                index: to_port,
            });
        }
        let edge = Edge {
            from: from.clone(),
            from_port,
            to: to.clone(),
            to_port,
        };
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
        Ok(())
    }

    /// All edges leaving one output port, in insertion order.
    pub fn edges_from<'a>(
        &'a self,
        id: &'a NodeId,
        port: usize,
    ) -> impl Iterator<Item = &'a Edge> {
        self.edges
            .iter()
            .filter(move |edge| &edge.from == id && edge.from_port == port)
    }

    /// Removes every node and edge. Used by "new workflow" and by the
    /// importer's full-replace step.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}
