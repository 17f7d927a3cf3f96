use super::document::{ConnectionRecord, StepRecord, WorkflowDocument};
use super::{CANONICAL_EXTENSION, DOCUMENT_ENTRY};
use crate::attachment::{AttachmentStore, VIRTUAL_ROOT};
use crate::error::ExportError;
use crate::graph::{GraphSnapshot, Node, NodeId};
use crate::schema::NodeType;
use ahash::AHashMap;
use serde_json::{Map, Value};
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Serializes a graph snapshot into a single workflow archive.
///
/// Per-node problems (a connection whose destination has vanished) are logged
/// and skipped so one bad node never loses the rest of the graph; only
/// failures to write the archive itself abort the call.
pub struct Exporter<'a> {
    snapshot: &'a GraphSnapshot,
    store: &'a AttachmentStore,
    workflow_name: String,
    description: String,
}

impl<'a> Exporter<'a> {
    pub fn new(snapshot: &'a GraphSnapshot, store: &'a AttachmentStore) -> Self {
        Self {
            snapshot,
            store,
            workflow_name: "untitled workflow".to_string(),
            description: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.workflow_name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Writes the archive at `target` (extension forced to `.flow`) and
    /// returns the step records that were written.
    pub fn export(&self, target: &Path) -> Result<Vec<StepRecord>, ExportError> {
        let document = self.build_document();
        let path = force_canonical_extension(target);
        self.write_archive(&document, &path)?;
        info!(
            path = %path.display(),
            steps = document.steps.len(),
            "workflow exported"
        );
        Ok(document.steps)
    }

    /// The pure projection half of an export: step records with sequence ids
    /// assigned in snapshot iteration order, no I/O.
    pub fn build_document(&self) -> WorkflowDocument {
        let mut sequence_ids: AHashMap<_, _> = AHashMap::new();
        for (index, node) in self.snapshot.nodes().iter().enumerate() {
            sequence_ids.insert(node.id().clone(), (index + 1) as u32);
        }

        let steps = self
            .snapshot
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| self.step_record(node, (index + 1) as u32, &sequence_ids))
            .collect();

        WorkflowDocument {
            workflow_name: self.workflow_name.clone(),
            description: self.description.clone(),
            steps,
        }
    }

    fn step_record(
        &self,
        node: &Node,
        sequence_id: u32,
        sequence_ids: &AHashMap<NodeId, u32>,
    ) -> StepRecord {
        let mut connections = Vec::new();
        for (port_index, port) in node.output_ports().iter().enumerate() {
            for edge in self.snapshot.edges_from(node.id(), port_index) {
                match sequence_ids.get(&edge.to) {
                    Some(destination) => connections.push(ConnectionRecord {
                        from_port_index: port_index as u32,
                        from_port_name: port.name.to_string(),
                        to_node_id: Some(edge.to.to_string()),
                        to_node_sequence_id: Some(*destination),
                    }),
                    None => warn!(
                        node = %node.id(),
                        destination = %edge.to,
                        "connection destination not in snapshot, skipped"
                    ),
                }
            }
        }

        let attached = node.attached_file();
        StepRecord {
            sequence_id,
            name: node.name.clone(),
            tag: node.node_type().tag().to_string(),
            position: Some([node.position.0, node.position.1]),
            node_id: Some(node.id().to_string()),
            connections,
            attached_file: (!attached.is_empty()).then(|| attached.to_string()),
            fields: type_fields(node),
        }
    }

    fn write_archive(&self, document: &WorkflowDocument, path: &Path) -> Result<(), ExportError> {
        let json = document.to_json()?;
        let file = fs::File::create(path).map_err(|error| ExportError::ArchiveCreate {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let write_failed = |entry: &str| {
            let entry = entry.to_string();
            move |error: zip::result::ZipError| ExportError::ArchiveWrite {
                entry,
                message: error.to_string(),
            }
        };

        writer
            .start_file(DOCUMENT_ENTRY, options)
            .map_err(write_failed(DOCUMENT_ENTRY))?;
        writer
            .write_all(json.as_bytes())
            .map_err(|error| ExportError::ArchiveWrite {
                entry: DOCUMENT_ENTRY.to_string(),
                message: error.to_string(),
            })?;

        for (relative, absolute) in self.store.files() {
            let entry = format!("{VIRTUAL_ROOT}/{relative}");
            writer
                .start_file(entry.as_str(), options)
                .map_err(write_failed(&entry))?;
            let mut source =
                fs::File::open(&absolute).map_err(|error| ExportError::AttachmentRead {
                    path: absolute.display().to_string(),
                    message: error.to_string(),
                })?;
            io::copy(&mut source, &mut writer).map_err(|error| ExportError::ArchiveWrite {
                entry: entry.clone(),
                message: error.to_string(),
            })?;
            debug!(entry = %entry, "attachment bundled");
        }

        writer.finish().map_err(|error| ExportError::ArchiveCreate {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        Ok(())
    }
}

/// Replaces the target's extension with the canonical one. An extension is
/// replaced, never appended: `report.zip` becomes `report.flow`.
pub fn force_canonical_extension(target: &Path) -> PathBuf {
    match target.extension().and_then(OsStr::to_str) {
        Some(ext) if ext.eq_ignore_ascii_case(CANONICAL_EXTENSION) => target.to_path_buf(),
        _ => target.with_extension(CANONICAL_EXTENSION),
    }
}

/// The type-specific fields of a step record, including the synthesized
/// `instruction` sentences for trigger, decision and conclusion steps.
fn type_fields(node: &Node) -> Map<String, Value> {
    let mut fields = Map::new();
    let value = |name: &str| node.attribute(name).unwrap_or_default().to_string();
    let mut put = |name: &str, text: String| {
        fields.insert(name.to_string(), Value::String(text));
    };

    match node.node_type() {
        NodeType::TriggerSource => {
            put("trigger_source", value("trigger_source"));
            put("note", value("note"));
        }
        NodeType::Trigger => {
            put("situation", value("situation"));
            put("situation_type", value("situation_type"));
            put(
                "instruction",
                format!(
                    "situation: {} - start the analysis when this situation occurs.",
                    value("situation")
                ),
            );
        }
        NodeType::DataQuery => {
            put("description", value("description"));
        }
        NodeType::TableSource => {
            put("target_table", value("target_table"));
            put("target_columns", value("target_columns"));
        }
        NodeType::ScreenSource => {
            put("screen_name", value("screen_name"));
            put("screen_url", value("screen_url"));
            put("screen_elements", value("screen_elements"));
        }
        NodeType::SqlSource => {
            put("sql_query", value("sql_query"));
            put("sql_description", value("sql_description"));
        }
        NodeType::LogSource => {
            put("log_source", value("log_source"));
            put("log_path", value("log_path"));
            put("log_pattern", value("log_pattern"));
        }
        NodeType::Decision => {
            put("condition", value("condition"));
            put("reasoning", value("reasoning"));
            put(
                "instruction",
                format!("condition: {} - {}", value("condition"), value("reasoning")),
            );
        }
        NodeType::Loop => {
            put("target", value("target"));
            put("exit_condition", value("exit_condition"));
        }
        NodeType::Conclusion => {
            put("conclusion", value("conclusion"));
            put("conclusion_type", value("conclusion_type"));
            put("instruction", format!("conclusion: {}", value("conclusion")));
        }
    }
    fields
}
