pub mod lookup;

pub use lookup::*;

use crate::graph::Node;
use ahash::AHashMap;

/// Attribute present on every node type, holding the virtual path of the
/// node's binary attachment (empty string when nothing is attached).
pub const ATTACHED_FILE: &str = "attached_file";

/// Namespace used for the fully-qualified type identifiers found in legacy
/// documents that predate the short export tags.
pub const TYPE_NAMESPACE: &str = "workflow.nodes";

const TRIGGER_KINDS: [&str; 3] = ["mail", "messenger", "anomaly detection"];
const CONCLUSION_TYPES: [&str; 4] = [
    "root cause",
    "corrective action",
    "preventive measure",
    "other",
];

/// The closed set of reasoning-step kinds a graph can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeType {
    TriggerSource,
    Trigger,
    DataQuery,
    TableSource,
    ScreenSource,
    SqlSource,
    LogSource,
    Decision,
    Loop,
    Conclusion,
}

impl NodeType {
    pub const ALL: [NodeType; 10] = [
        NodeType::TriggerSource,
        NodeType::Trigger,
        NodeType::DataQuery,
        NodeType::TableSource,
        NodeType::ScreenSource,
        NodeType::SqlSource,
        NodeType::LogSource,
        NodeType::Decision,
        NodeType::Loop,
        NodeType::Conclusion,
    ];

    /// The short tag written into step records.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeType::TriggerSource => "trigger_source",
            NodeType::Trigger => "trigger",
            NodeType::DataQuery => "observation",
            NodeType::TableSource => "table",
            NodeType::ScreenSource => "screen",
            NodeType::SqlSource => "sql",
            NodeType::LogSource => "log",
            NodeType::Decision => "reasoning",
            NodeType::Loop => "loop",
            NodeType::Conclusion => "conclusion",
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            NodeType::TriggerSource => "TriggerSourceNode",
            NodeType::Trigger => "TriggerNode",
            NodeType::DataQuery => "DataQueryNode",
            NodeType::TableSource => "TableSourceNode",
            NodeType::ScreenSource => "ScreenSourceNode",
            NodeType::SqlSource => "SqlSourceNode",
            NodeType::LogSource => "LogSourceNode",
            NodeType::Decision => "DecisionNode",
            NodeType::Loop => "LoopNode",
            NodeType::Conclusion => "ConclusionNode",
        }
    }

    /// The fully-qualified identifier older documents stored in place of the
    /// short tag.
    pub fn identifier(&self) -> String {
        format!("{TYPE_NAMESPACE}.{}", self.type_name())
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.tag() == tag)
    }

    /// Resolves a fully-qualified type identifier by its trailing type name,
    /// accepting any dotted namespace prefix.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let (_, name) = identifier.rsplit_once('.')?;
        Self::ALL.into_iter().find(|ty| ty.type_name() == name)
    }
}

/// A named connection point on a node. Every port in the shipped schemas
/// accepts any number of edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub name: &'static str,
}

/// How an attribute's value is edited and defaulted.
#[derive(Debug, Clone)]
pub enum AttributeKind {
    /// Free text.
    Text { default: &'static str },
    /// Enumerated choice. The current value is not constrained to the list:
    /// a free-form override is accepted and preserved.
    Choice { options: Vec<String> },
}

/// One attribute in a node type's ordered attribute schema.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub kind: AttributeKind,
}

impl AttributeSpec {
    /// The value a freshly created node starts with: the declared default for
    /// text attributes, the first option for choices.
    pub fn default_value(&self) -> String {
        match &self.kind {
            AttributeKind::Text { default } => default.to_string(),
            AttributeKind::Choice { options } => options.first().cloned().unwrap_or_default(),
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            AttributeKind::Choice { options } => Some(options),
            AttributeKind::Text { .. } => None,
        }
    }
}

/// The full shape of one node type: ordered ports and ordered attributes.
#[derive(Debug, Clone)]
pub struct NodeSchema {
    pub node_type: NodeType,
    pub display_name: &'static str,
    pub inputs: Vec<PortSpec>,
    pub outputs: Vec<PortSpec>,
    pub attributes: Vec<AttributeSpec>,
}

impl NodeSchema {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|spec| spec.name == name)
    }
}

/// Declares, per node type, the port layout and attribute schema, and
/// constructs nodes with their defaults applied.
#[derive(Debug, Clone)]
pub struct NodeSchemaRegistry {
    schemas: AHashMap<NodeType, NodeSchema>,
}

impl NodeSchemaRegistry {
    pub fn new(lookups: &LookupLists) -> Self {
        let mut schemas = AHashMap::new();
        for node_type in NodeType::ALL {
            schemas.insert(node_type, build_schema(node_type, lookups));
        }
        Self { schemas }
    }

    pub fn schema(&self, node_type: NodeType) -> &NodeSchema {
        self.schemas
            .get(&node_type)
            .expect("registry holds a schema for every node type")
    }

    /// Re-resolves the choice option lists against a fresh lookup snapshot.
    ///
    /// This is the notification path for list changes made in the management
    /// panels: already-constructed nodes keep their current values (including
    /// values absent from the new lists), only the offered options move.
    pub fn refresh(&mut self, lookups: &LookupLists) {
        for node_type in NodeType::ALL {
            self.schemas
                .insert(node_type, build_schema(node_type, lookups));
        }
    }

    /// Creates a node of `node_type` with every attribute at its schema
    /// default and the attachment attribute ensured.
    pub fn create_node(&self, node_type: NodeType, name: impl Into<String>) -> Node {
        Node::from_schema(self.schema(node_type), name)
    }
}

fn build_schema(node_type: NodeType, lookups: &LookupLists) -> NodeSchema {
    match node_type {
        NodeType::TriggerSource => NodeSchema {
            node_type,
            display_name: "Trigger Source",
            inputs: ports(&[]),
            outputs: ports(&["situation"]),
            attributes: vec![
                choice("trigger_source", to_strings(&TRIGGER_KINDS)),
                text("note", ""),
            ],
        },
        NodeType::Trigger => NodeSchema {
            node_type,
            display_name: "Trigger",
            inputs: ports(&["trigger"]),
            outputs: ports(&["start"]),
            attributes: vec![
                text("situation", ""),
                choice("situation_type", lookups.situation_types.clone()),
            ],
        },
        NodeType::DataQuery => NodeSchema {
            node_type,
            display_name: "Data Query",
            inputs: ports(&["previous step", "data sources"]),
            outputs: ports(&["next step"]),
            attributes: vec![text("description", "Describe the information to collect")],
        },
        NodeType::TableSource => NodeSchema {
            node_type,
            display_name: "Table",
            inputs: ports(&["input tables"]),
            outputs: ports(&["table data"]),
            attributes: vec![
                choice("target_table", lookups.tables.clone()),
                text("target_columns", "e.g. A, B, C"),
            ],
        },
        NodeType::ScreenSource => NodeSchema {
            node_type,
            display_name: "Screen",
            inputs: ports(&["input data"]),
            outputs: ports(&["screen data"]),
            attributes: vec![
                choice("screen_name", lookups.screens.clone()),
                text("screen_url", ""),
                text("screen_elements", ""),
            ],
        },
        NodeType::SqlSource => NodeSchema {
            node_type,
            display_name: "SQL",
            inputs: ports(&["input tables"]),
            outputs: ports(&["query results"]),
            attributes: vec![
                text("sql_query", "SELECT * FROM table_name WHERE condition"),
                text("sql_description", ""),
            ],
        },
        NodeType::LogSource => NodeSchema {
            node_type,
            display_name: "Log",
            inputs: ports(&["input data"]),
            outputs: ports(&["log data"]),
            attributes: vec![
                choice("log_source", lookups.logs.clone()),
                text("log_path", ""),
                text("log_pattern", ""),
            ],
        },
        NodeType::Decision => NodeSchema {
            node_type,
            display_name: "Decision",
            inputs: ports(&["data"]),
            outputs: ports(&["true", "false"]),
            attributes: vec![text("condition", ""), text("reasoning", "")],
        },
        NodeType::Loop => NodeSchema {
            node_type,
            display_name: "Loop",
            inputs: ports(&["items"]),
            outputs: ports(&["enter", "exit"]),
            attributes: vec![text("target", ""), text("exit_condition", "")],
        },
        NodeType::Conclusion => NodeSchema {
            node_type,
            display_name: "Conclusion",
            inputs: ports(&["input"]),
            outputs: ports(&[]),
            attributes: vec![
                text("conclusion", ""),
                choice("conclusion_type", to_strings(&CONCLUSION_TYPES)),
            ],
        },
    }
}

fn ports(names: &[&'static str]) -> Vec<PortSpec> {
    names.iter().map(|name| PortSpec { name: *name }).collect()
}

fn text(name: &'static str, default: &'static str) -> AttributeSpec {
    AttributeSpec {
        name,
        kind: AttributeKind::Text { default },
    }
}

fn choice(name: &'static str, options: Vec<String>) -> AttributeSpec {
    AttributeSpec {
        name,
        kind: AttributeKind::Choice { options },
    }
}
