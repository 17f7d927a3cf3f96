//! # Flowpack - Workflow Graph Serialization Engine
//!
//! **Flowpack** is the persistence core of a node-graph editor for expert
//! reasoning workflows. A domain expert assembles a directed graph of typed
//! reasoning steps (triggers, data queries, decisions, loops, conclusions);
//! this crate maps that graph to and from a portable `.flow` archive — one
//! structured JSON document plus the nodes' binary attachments in a single
//! zip-compatible container — ready to train or prompt an AI system.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Snapshot**: Construct nodes through the
//!     [`NodeSchemaRegistry`](schema::NodeSchemaRegistry) (which applies
//!     per-type port layouts and attribute defaults) and wire them up inside
//!     a [`GraphSnapshot`](graph::GraphSnapshot).
//! 2.  **Export**: An [`Exporter`](archive::Exporter) assigns dense step
//!     numbers, flattens every node into a step record, and bundles the
//!     document with the [`AttachmentStore`](attachment::AttachmentStore)'s
//!     files into one archive.
//! 3.  **Import**: An [`Importer`](archive::Importer) reads an archive (or a
//!     legacy bare JSON document), repopulates the attachment store, and
//!     rebuilds the snapshot with full-replace semantics — tolerating
//!     partial and legacy data one record at a time.
//! 4.  **Copy/Paste**: The [`clipboard`] sub-codec moves a selected subgraph
//!     through an in-process buffer, preserving relative layout and internal
//!     edges only.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let lookups = LookupLists::default();
//!     let registry = NodeSchemaRegistry::new(&lookups);
//!     let store = AttachmentStore::new()?;
//!
//!     // Build a two-step graph: a trigger source feeding a trigger.
//!     let mut snapshot = GraphSnapshot::new();
//!     let source = snapshot.add_node(registry.create_node(NodeType::TriggerSource, "Mail"));
//!     let trigger = snapshot.add_node(registry.create_node(NodeType::Trigger, "Delayed lot"));
//!     snapshot.connect(&source, 0, &trigger, 0)?;
//!
//!     // Export it as a single archive.
//!     let steps = Exporter::new(&snapshot, &store)
//!         .with_name("transport analysis")
//!         .export(Path::new("transport.flow"))?;
//!     println!("exported {} steps", steps.len());
//!
//!     // Load it back into a fresh snapshot.
//!     let mut restored = GraphSnapshot::new();
//!     let importer = Importer::new(&registry, &store);
//!     let document = importer.import(&mut restored, Path::new("transport.flow"))?;
//!     println!("imported '{}'", document.workflow_name);
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod attachment;
pub mod clipboard;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod schema;
