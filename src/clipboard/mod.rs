//! In-process copy/paste for a selected subgraph.
//!
//! A lighter-weight variant of export/import that never touches the archive
//! format: only internal edges survive, relative layout is preserved through
//! an anchor delta, and pasted nodes always receive fresh identities.

use crate::graph::{GraphSnapshot, NodeId};
use crate::schema::{ATTACHED_FILE, NodeSchemaRegistry, NodeType};
use ahash::{AHashMap, AHashSet};
use tracing::warn;

/// The clipboard buffer produced by [`copy_nodes`]. Pasting reads it without
/// mutating it, so the same payload can be pasted any number of times.
#[derive(Debug, Clone, Default)]
pub struct ClipboardPayload {
    entries: Vec<CopiedNode>,
}

impl ClipboardPayload {
    pub fn entries(&self) -> &[CopiedNode] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One copied node: everything needed to recreate it elsewhere.
#[derive(Debug, Clone)]
pub struct CopiedNode {
    pub source_id: NodeId,
    pub node_type: NodeType,
    pub name: String,
    pub position: (f64, f64),
    pub attributes: Vec<(String, String)>,
    pub connections: Vec<CopiedConnection>,
}

/// An edge between two copied nodes. Unlike archive restore, the destination
/// input port index is recorded and preserved.
#[derive(Debug, Clone)]
pub struct CopiedConnection {
    pub from_port: usize,
    pub to_source_id: NodeId,
    pub to_port: usize,
}

/// Copies the selected nodes into a clipboard payload.
///
/// Attributes are re-read one known name at a time, tolerating absent ones.
/// Only connections whose destination is also selected are kept; edges
/// leaving the selection are silently dropped.
pub fn copy_nodes(
    snapshot: &GraphSnapshot,
    registry: &NodeSchemaRegistry,
    selection: &[NodeId],
) -> ClipboardPayload {
    let selected: AHashSet<&NodeId> = selection.iter().collect();
    let mut entries = Vec::new();

    for id in selection {
        let Some(node) = snapshot.node(id) else {
            warn!(node = %id, "selected node not in snapshot, not copied");
            continue;
        };

        let schema = registry.schema(node.node_type());
        let mut attributes = Vec::new();
        for spec in &schema.attributes {
            if let Some(value) = node.attribute(spec.name) {
                attributes.push((spec.name.to_string(), value.to_string()));
            }
        }
        if let Some(value) = node.attribute(ATTACHED_FILE) {
            attributes.push((ATTACHED_FILE.to_string(), value.to_string()));
        }

        let connections = snapshot
            .edges()
            .iter()
            .filter(|edge| &edge.from == id && selected.contains(&edge.to))
            .map(|edge| CopiedConnection {
                from_port: edge.from_port,
                to_source_id: edge.to.clone(),
                to_port: edge.to_port,
            })
            .collect();

        entries.push(CopiedNode {
            source_id: id.clone(),
            node_type: node.node_type(),
            name: node.name.clone(),
            position: node.position,
            attributes,
            connections,
        });
    }

    ClipboardPayload { entries }
}

/// Pastes a payload into the snapshot, anchored at `anchor`.
///
/// Every entry is offset by the same delta (anchor minus the first entry's
/// original position) so the relative layout survives. Internal connections
/// are rebuilt through an identity map scoped to this call; originals are
/// never referenced.
pub fn paste_nodes(
    snapshot: &mut GraphSnapshot,
    registry: &NodeSchemaRegistry,
    payload: &ClipboardPayload,
    anchor: (f64, f64),
) -> Vec<NodeId> {
    let Some(first) = payload.entries.first() else {
        return Vec::new();
    };
    let delta = (anchor.0 - first.position.0, anchor.1 - first.position.1);

    let mut remapped: AHashMap<NodeId, NodeId> = AHashMap::new();
    let mut pasted = Vec::new();
    for entry in &payload.entries {
        let mut node = registry.create_node(entry.node_type, entry.name.clone());
        node.position = (entry.position.0 + delta.0, entry.position.1 + delta.1);
        for (name, value) in &entry.attributes {
            node.set_attribute(name, value.clone());
        }
        let id = snapshot.add_node(node);
        remapped.insert(entry.source_id.clone(), id.clone());
        pasted.push(id);
    }

    for entry in &payload.entries {
        let Some(from) = remapped.get(&entry.source_id) else {
            continue;
        };
        for connection in &entry.connections {
            let Some(to) = remapped.get(&connection.to_source_id) else {
                continue;
            };
            if let Err(error) = snapshot.connect(from, connection.from_port, to, connection.to_port)
            {
                warn!(%error, "pasted connection skipped");
            }
        }
    }

    pasted
}
