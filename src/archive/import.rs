use super::document::WorkflowDocument;
use super::{CANONICAL_EXTENSION, DOCUMENT_ENTRY};
use crate::attachment::{AttachmentStore, VIRTUAL_ROOT};
use crate::error::ImportError;
use crate::graph::{GraphSnapshot, NodeId};
use crate::schema::{NodeSchemaRegistry, NodeType};
use ahash::AHashMap;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Rebuilds a graph snapshot from a workflow archive or bare document file.
///
/// Import has full-replace semantics: the attachment store is cleared first,
/// then every node in the target snapshot is deleted before any record is
/// restored. Per-record and per-connection problems are logged and skipped;
/// a missing file or unparseable document fails the whole call, and whatever
/// was created before the failure stays in the snapshot (no rollback).
pub struct Importer<'a> {
    registry: &'a NodeSchemaRegistry,
    store: &'a AttachmentStore,
}

impl<'a> Importer<'a> {
    pub fn new(registry: &'a NodeSchemaRegistry, store: &'a AttachmentStore) -> Self {
        Self { registry, store }
    }

    /// Replaces `snapshot`'s contents with the graph stored at `source` and
    /// returns the parsed document for the caller's UI.
    pub fn import(
        &self,
        snapshot: &mut GraphSnapshot,
        source: &Path,
    ) -> Result<WorkflowDocument, ImportError> {
        self.store.clear()?;

        let document = if is_archive(source) {
            self.read_archive(source)?
        } else {
            read_bare_document(source)?
        };

        snapshot.clear();
        let (by_sequence, by_identity) = self.restore_nodes(snapshot, &document);
        let restored = restore_connections(snapshot, &document, &by_sequence, &by_identity);
        info!(
            nodes = snapshot.len(),
            connections = restored,
            "workflow imported"
        );
        Ok(document)
    }

    /// Opens the container, reads the document entry, and extracts every
    /// attachment entry into the store.
    fn read_archive(&self, source: &Path) -> Result<WorkflowDocument, ImportError> {
        let file = fs::File::open(source).map_err(|error| ImportError::FileOpen {
            path: source.display().to_string(),
            message: error.to_string(),
        })?;
        let archive_read = |error: zip::result::ZipError| ImportError::ArchiveRead {
            path: source.display().to_string(),
            message: error.to_string(),
        };
        let mut archive = ZipArchive::new(file).map_err(archive_read)?;

        // Older writers did not always use the canonical entry name; any
        // single JSON entry is accepted in its place.
        let document_entry = if archive.by_name(DOCUMENT_ENTRY).is_ok() {
            DOCUMENT_ENTRY.to_string()
        } else {
            archive
                .file_names()
                .find(|name| name.ends_with(".json"))
                .map(str::to_string)
                .ok_or_else(|| ImportError::MissingDocument {
                    path: source.display().to_string(),
                })?
        };

        let text = {
            let mut entry = archive.by_name(&document_entry).map_err(archive_read)?;
            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .map_err(|error| ImportError::ArchiveRead {
                    path: source.display().to_string(),
                    message: error.to_string(),
                })?;
            text
        };
        let document = WorkflowDocument::from_json(&text)?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(archive_read)?;
            let name = entry.name().to_string();
            let Some(relative) = attachment_entry_path(&name) else {
                continue;
            };
            match self.store.write_entry(&relative, &mut entry) {
                Ok(destination) => {
                    debug!(entry = %name, path = %destination.display(), "attachment restored");
                }
                Err(error) => warn!(entry = %name, %error, "attachment skipped"),
            }
        }

        Ok(document)
    }

    /// First pass: one node per step record, with fields applied and the two
    /// reconnection lookup tables filled in.
    fn restore_nodes(
        &self,
        snapshot: &mut GraphSnapshot,
        document: &WorkflowDocument,
    ) -> (AHashMap<u32, NodeId>, AHashMap<String, NodeId>) {
        let mut by_sequence = AHashMap::new();
        let mut by_identity = AHashMap::new();

        for (index, record) in document.steps.iter().enumerate() {
            let Some(node_type) = resolve_tag(&record.tag) else {
                warn!(tag = %record.tag, "unknown step type, record skipped");
                continue;
            };
            let schema = self.registry.schema(node_type);
            let name = if record.name.is_empty() {
                schema.display_name.to_string()
            } else {
                record.name.clone()
            };

            let mut node = self.registry.create_node(node_type, name);
            node.position = record
                .position
                .map(|[x, y]| (x, y))
                .unwrap_or_else(|| fallback_position(index));
            node.ensure_attached_file();
            for spec in &schema.attributes {
                if let Some(value) = record.fields.get(spec.name) {
                    node.set_attribute(spec.name, field_to_string(value));
                }
            }
            if let Some(attached) = &record.attached_file {
                node.set_attached_file(attached.clone());
            }

            let id = snapshot.add_node(node);
            by_sequence.insert(record.sequence_id, id.clone());
            if let Some(identity) = &record.node_id {
                by_identity.insert(identity.clone(), id);
            }
        }

        (by_sequence, by_identity)
    }
}

/// Second pass: rebuild connections. Destinations resolve by sequence id
/// first, then by original node identity; source ports by index, then by
/// name. Restored edges always land on the destination's first input port.
fn restore_connections(
    snapshot: &mut GraphSnapshot,
    document: &WorkflowDocument,
    by_sequence: &AHashMap<u32, NodeId>,
    by_identity: &AHashMap<String, NodeId>,
) -> usize {
    let mut restored = 0;
    for record in &document.steps {
        let Some(from_id) = by_sequence.get(&record.sequence_id) else {
            continue;
        };
        for connection in &record.connections {
            let to_id = connection
                .to_node_sequence_id
                .and_then(|sequence| by_sequence.get(&sequence))
                .or_else(|| {
                    connection
                        .to_node_id
                        .as_ref()
                        .and_then(|identity| by_identity.get(identity))
                });
            let Some(to_id) = to_id else {
                warn!(
                    from = record.sequence_id,
                    to_sequence = connection.to_node_sequence_id,
                    to_identity = connection.to_node_id.as_deref().unwrap_or(""),
                    "connection destination unresolved, skipped"
                );
                continue;
            };

            let from_port = snapshot.node(from_id).and_then(|node| {
                let index = connection.from_port_index as usize;
                if index < node.output_ports().len() {
                    Some(index)
                } else {
                    node.output_port_index(&connection.from_port_name)
                }
            });
            let Some(from_port) = from_port else {
                warn!(
                    from = record.sequence_id,
                    port = connection.from_port_index,
                    port_name = %connection.from_port_name,
                    "output port unresolved, connection skipped"
                );
                continue;
            };

            match snapshot.connect(from_id, from_port, to_id, 0) {
                Ok(()) => restored += 1,
                Err(error) => warn!(from = record.sequence_id, %error, "connection skipped"),
            }
        }
    }
    restored
}

/// A bare structured-document file: same schema, no archive wrapper, no
/// attachments.
fn read_bare_document(source: &Path) -> Result<WorkflowDocument, ImportError> {
    let text = fs::read_to_string(source).map_err(|error| ImportError::FileOpen {
        path: source.display().to_string(),
        message: error.to_string(),
    })?;
    WorkflowDocument::from_json(&text)
}

fn is_archive(source: &Path) -> bool {
    source
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            ext.eq_ignore_ascii_case(CANONICAL_EXTENSION) || ext.eq_ignore_ascii_case("zip")
        })
}

/// Maps an archive entry name to its path inside the store, or `None` when
/// the entry is not an attachment.
fn attachment_entry_path(name: &str) -> Option<std::path::PathBuf> {
    if name.ends_with('/') {
        return None;
    }
    let path = Path::new(name);
    path.strip_prefix(VIRTUAL_ROOT).ok().map(Path::to_path_buf)
}

/// Short export tags resolve through the fixed table; anything dotted is
/// treated as a fully-qualified type identifier from an older document.
fn resolve_tag(tag: &str) -> Option<NodeType> {
    NodeType::from_tag(tag).or_else(|| NodeType::from_identifier(tag))
}

/// Deterministic layout for records without a stored position: a horizontal
/// row in record order.
fn fallback_position(index: usize) -> (f64, f64) {
    (100.0 + index as f64 * 400.0, 300.0)
}

fn field_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
