use thiserror::Error;

/// Errors raised by the attachment store's scratch-directory operations.
#[derive(Error, Debug, Clone)]
pub enum AttachmentError {
    #[error("Could not create the attachment scratch directory: {0}")]
    ScratchDirUnavailable(String),

    #[error("Could not copy '{source_path}' into the attachment store: {message}")]
    CopyFailed {
        source_path: String,
        message: String,
    },

    #[error("Could not clear the attachment scratch directory: {0}")]
    ClearFailed(String),

    #[error("Could not write extracted attachment '{entry}': {message}")]
    WriteFailed { entry: String, message: String },
}

/// Errors that are fatal to a whole export call.
///
/// Per-node problems (an unresolvable connection destination) are logged and
/// skipped inside the exporter and never surface here.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("Failed to serialize the workflow document: {0}")]
    DocumentSerialize(String),

    #[error("Could not create archive '{path}': {message}")]
    ArchiveCreate { path: String, message: String },

    #[error("Could not write archive entry '{entry}': {message}")]
    ArchiveWrite { entry: String, message: String },

    #[error("Could not read stored attachment '{path}': {message}")]
    AttachmentRead { path: String, message: String },
}

/// Errors that make a whole import call fail.
///
/// The snapshot may have been partially rebuilt when one of these is returned;
/// the importer does not roll back. Per-record and per-connection problems are
/// logged and skipped instead of surfacing here.
#[derive(Error, Debug, Clone)]
pub enum ImportError {
    #[error("Could not open '{path}': {message}")]
    FileOpen { path: String, message: String },

    #[error("Could not read archive '{path}': {message}")]
    ArchiveRead { path: String, message: String },

    #[error("Archive '{path}' contains no workflow document entry")]
    MissingDocument { path: String },

    #[error("Failed to parse workflow document: {0}")]
    DocumentParse(String),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

/// Errors raised by direct graph-snapshot mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' is not part of this snapshot")]
    UnknownNode(String),

    #[error("Node '{node_id}' has no {direction} port at index {index}")]
    PortOutOfRange {
        node_id: String,
        direction: &'static str,
        index: usize,
    },
}
