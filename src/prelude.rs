//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the flowpack
//! crate. Import this module to get access to the core functionality without
//! having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowpack::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let registry = NodeSchemaRegistry::new(&LookupLists::default());
//! let store = AttachmentStore::new()?;
//! let mut snapshot = GraphSnapshot::new();
//!
//! let importer = Importer::new(&registry, &store);
//! let document = importer.import(&mut snapshot, Path::new("analysis.flow"))?;
//! println!("{} steps loaded", document.steps.len());
//! # Ok(())
//! # }
//! ```

// Serialization engine
pub use crate::archive::{
    CANONICAL_EXTENSION, ConnectionRecord, DOCUMENT_ENTRY, Exporter, Importer, StepRecord,
    WorkflowDocument,
};

// Graph model and schemas
pub use crate::graph::{Edge, GraphSnapshot, Node, NodeId};
pub use crate::schema::{
    ATTACHED_FILE, AttributeKind, AttributeSpec, LookupLists, NodeSchema, NodeSchemaRegistry,
    NodeType, PortSpec,
};

// Attachments
pub use crate::attachment::{AttachmentStore, VIRTUAL_ROOT};

// Clipboard sub-codec
pub use crate::clipboard::{ClipboardPayload, copy_nodes, paste_nodes};

// Error types
pub use crate::error::{AttachmentError, ExportError, GraphError, ImportError};

// Standard library re-exports commonly used with this crate
pub use std::path::Path;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
