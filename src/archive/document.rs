use crate::error::{ExportError, ImportError};
use serde::{Deserialize, Serialize};

/// The structured document at the heart of an archive: workflow metadata plus
/// one flattened step record per node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub workflow_name: String,
    pub description: String,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

impl WorkflowDocument {
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        serde_json::from_str(text).map_err(|error| ImportError::DocumentParse(error.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self)
            .map_err(|error| ExportError::DocumentSerialize(error.to_string()))
    }
}

/// The flattened, export-time projection of one node.
///
/// `sequence_id` is a dense 1-based ordinal recomputed on every export, for
/// human- and model-readable step numbering. `node_id` is the stable identity
/// from the editing session, carried so connections can be reconciled even
/// when sequence ids shift between saves. Type-specific attribute values are
/// flattened into the record alongside the fixed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub sequence_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_file: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// One outgoing connection of a step, naming the destination both by its
/// original node identity and by its export-time sequence id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub from_port_index: u32,
    #[serde(default)]
    pub from_port_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_node_sequence_id: Option<u32>,
}
