use crate::schema::{ATTACHED_FILE, NodeSchema, NodeType, PortSpec};
use ahash::AHashMap;
use rand::Rng;
use std::fmt;

/// Process-unique, stable node identity.
///
/// Assigned once at creation and never reused; pasted or re-imported nodes
/// always receive fresh identities. Within one editing session the identity
/// is what edges refer to; across save/load cycles it is carried in the
/// document purely so connections can be reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub(crate) fn generate() -> Self {
        let suffix: String = rand::rng()
            .sample_iter(rand::distr::Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        NodeId(format!("n-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One reasoning step in the graph.
///
/// Position is a required field: there is exactly one way to read or write a
/// node's coordinates. The attribute capability is total — `set_attribute`
/// accepts any name, so callers never need probing fallback chains.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    node_type: NodeType,
    pub name: String,
    pub position: (f64, f64),
    attributes: AHashMap<String, String>,
    inputs: Vec<PortSpec>,
    outputs: Vec<PortSpec>,
}

impl Node {
    pub(crate) fn from_schema(schema: &NodeSchema, name: impl Into<String>) -> Self {
        let mut attributes = AHashMap::new();
        for spec in &schema.attributes {
            attributes.insert(spec.name.to_string(), spec.default_value());
        }
        let mut node = Self {
            id: NodeId::generate(),
            node_type: schema.node_type,
            name: name.into(),
            position: (0.0, 0.0),
            attributes,
            inputs: schema.inputs.clone(),
            outputs: schema.outputs.clone(),
        };
        node.ensure_attached_file();
        node
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Idempotently initializes the attachment attribute to the empty string.
    /// Nodes built through the registry are already ensured; this exists for
    /// records that predate the attachment feature.
    pub fn ensure_attached_file(&mut self) {
        self.attributes
            .entry(ATTACHED_FILE.to_string())
            .or_default();
    }

    /// The stored attachment reference, or `""` when nothing is attached.
    pub fn attached_file(&self) -> &str {
        self.attribute(ATTACHED_FILE).unwrap_or_default()
    }

    pub fn set_attached_file(&mut self, value: impl Into<String>) {
        self.set_attribute(ATTACHED_FILE, value);
    }

    pub fn input_ports(&self) -> &[PortSpec] {
        &self.inputs
    }

    pub fn output_ports(&self) -> &[PortSpec] {
        &self.outputs
    }

    pub fn output_port_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|port| port.name == name)
    }
}
