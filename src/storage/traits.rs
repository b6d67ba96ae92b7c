//! Storage traits and error types
//!
//! This module defines the filesystem interface the crawler writes through
//! and its associated error type.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Ledger file {path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for filesystem backends
///
/// The crawler only ever needs four things from the disk: does a file exist,
/// read a text file, append one line to a text file, and write a whole file.
/// Every open is scoped to the call, so handles are closed before returning.
pub trait FileStore {
    /// Returns true if a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Reads a UTF-8 text file
    ///
    /// # Returns
    ///
    /// * `Ok(Some(String))` - The file content
    /// * `Ok(None)` - No file at `path`
    /// * `Err(StorageError)` - The file exists but could not be read
    fn read_to_string(&self, path: &Path) -> StorageResult<Option<String>>;

    /// Appends `line` plus a newline to the file at `path`, creating it and
    /// its parent directories when absent
    fn append_line(&self, path: &Path, line: &str) -> StorageResult<()>;

    /// Writes `bytes` to `path`, replacing any existing content and creating
    /// parent directories when absent
    fn write_file(&self, path: &Path, bytes: &[u8]) -> StorageResult<()>;
}
