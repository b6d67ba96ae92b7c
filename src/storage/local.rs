//! Local filesystem implementation of [`FileStore`]

use crate::storage::traits::{FileStore, StorageError, StorageResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// [`FileStore`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(path: &Path) -> StorageResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))
            }
            _ => Ok(()),
        }
    }
}

impl FileStore for LocalFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> StorageResult<Option<String>> {
        match fs::read(path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StorageError::InvalidUtf8 {
                    path: path.to_path_buf(),
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn append_line(&self, path: &Path, line: &str) -> StorageResult<()> {
        Self::ensure_parent(path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| StorageError::io(path, e))?;

        writeln!(file, "{}", line).map_err(|e| StorageError::io(path, e))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> StorageResult<()> {
        Self::ensure_parent(path)?;
        fs::write(path, bytes).map_err(|e| StorageError::io(path, e))
    }
}
