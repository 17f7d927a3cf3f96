use crate::error::AttachmentError;
use rand::Rng;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Fixed folder name under which attachment entries live inside an archive.
/// Node attributes store paths of the form `attachments/<file>`.
pub const VIRTUAL_ROOT: &str = "attachments";

/// Manages the process-local scratch directory that backs node attachments.
///
/// The directory is acquired once at construction, cleared idempotently
/// before every import and on "new workflow", and removed when the store is
/// dropped or torn down — covering every exit path without an exit hook.
/// Stored names are disambiguated with a random suffix, so attachment
/// identity is decoupled from the original filename and re-importing a file
/// with the same base name never overwrites an existing attachment.
#[derive(Debug)]
pub struct AttachmentStore {
    scratch: TempDir,
}

impl AttachmentStore {
    pub fn new() -> Result<Self, AttachmentError> {
        let scratch = tempfile::Builder::new()
            .prefix("flowpack-attachments-")
            .tempdir()
            .map_err(|error| AttachmentError::ScratchDirUnavailable(error.to_string()))?;
        debug!(path = %scratch.path().display(), "attachment scratch directory ready");
        Ok(Self { scratch })
    }

    /// The scratch directory itself.
    pub fn root(&self) -> &Path {
        self.scratch.path()
    }

    /// Copies an external file into the store and returns the virtual path to
    /// persist on the node, of the form `attachments/<stem>_<suffix><ext>`.
    pub fn import_file(&self, source: &Path) -> Result<String, AttachmentError> {
        let stem = source
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("attachment");
        let extension = source
            .extension()
            .and_then(OsStr::to_str)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let stored_name = format!("{stem}_{}{extension}", random_suffix());
        let destination = self.scratch.path().join(&stored_name);
        fs::copy(source, &destination).map_err(|error| AttachmentError::CopyFailed {
            source_path: source.display().to_string(),
            message: error.to_string(),
        })?;
        Ok(format!("{VIRTUAL_ROOT}/{stored_name}"))
    }

    /// Resolves a stored attachment reference to a real filesystem path.
    ///
    /// Absolute inputs are returned unchanged — legacy records stored raw OS
    /// paths. Anything else is resolved against the scratch directory after
    /// stripping the virtual-root prefix if present.
    pub fn resolve(&self, stored: &str) -> PathBuf {
        let path = Path::new(stored);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let relative = path.strip_prefix(VIRTUAL_ROOT).unwrap_or(path);
        self.scratch.path().join(relative)
    }

    /// Deletes everything under the scratch directory without deleting the
    /// directory itself.
    pub fn clear(&self) -> Result<(), AttachmentError> {
        let entries = fs::read_dir(self.root())
            .map_err(|error| AttachmentError::ClearFailed(error.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|error| AttachmentError::ClearFailed(error.to_string()))?;
            let path = entry.path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|error| {
                AttachmentError::ClearFailed(format!("{}: {}", path.display(), error))
            })?;
        }
        Ok(())
    }

    /// Writes an extracted archive entry at `relative`, creating parent
    /// directories as needed. Rejects paths that would escape the scratch
    /// directory.
    pub fn write_entry(
        &self,
        relative: &Path,
        reader: &mut impl io::Read,
    ) -> Result<PathBuf, AttachmentError> {
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(AttachmentError::WriteFailed {
                entry: relative.display().to_string(),
                message: "entry path escapes the scratch directory".to_string(),
            });
        }
        let destination = self.scratch.path().join(relative);
        let failed = |error: io::Error| AttachmentError::WriteFailed {
            entry: relative.display().to_string(),
            message: error.to_string(),
        };
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(failed)?;
        }
        let mut file = fs::File::create(&destination).map_err(failed)?;
        io::copy(reader, &mut file).map_err(failed)?;
        Ok(destination)
    }

    /// Every stored file as `(slash-joined relative name, absolute path)`,
    /// sorted by name so archive layout is deterministic.
    pub fn files(&self) -> Vec<(String, PathBuf)> {
        let mut files = Vec::new();
        collect_files(self.root(), String::new(), &mut files);
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files
    }

    /// Removes the scratch directory. Errors are swallowed — teardown runs at
    /// process exit where nothing useful can be done about them. Dropping the
    /// store has the same effect.
    pub fn teardown(self) {
        let _ = self.scratch.close();
    }
}

fn collect_files(dir: &Path, prefix: String, files: &mut Vec<(String, PathBuf)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if path.is_dir() {
            collect_files(&path, relative, files);
        } else {
            files.push((relative, path));
        }
    }
}

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}
