//! Whole-file persistence for the target document.
//!
//! The document is read once and written once per run. A missing file is
//! not an error: it's the signal to start from a synthesized document.

use std::{fs, io, path::Path};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Read the whole document, or `None` if it doesn't exist.
pub fn read_document(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Read {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Overwrite the document with `text`.
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|source| StorageError::Write {
        path: path.display().to_string(),
        source,
    })
}
