pub mod document;
pub mod export;
pub mod import;

pub use document::*;
pub use export::*;
pub use import::*;

/// Name of the structured document entry inside an archive.
pub const DOCUMENT_ENTRY: &str = "workflow.json";

/// Canonical archive extension. Exports always end in `.flow`; imports also
/// accept a plain `.zip`.
pub const CANONICAL_EXTENSION: &str = "flow";
