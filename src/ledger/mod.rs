//! Ledger of already-fetched image URLs
//!
//! One ledger exists per board section. It lives in memory as a set and is
//! mirrored to an append-only log file holding one URL per line, so a
//! restarted crawler knows what it has already downloaded.

use crate::storage::{FileStore, StorageResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of image URLs fetched so far, backed by an append-only log
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    fetched: HashSet<String>,
}

impl Ledger {
    /// Creates an empty ledger that will append to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fetched: HashSet::new(),
        }
    }

    /// Loads a ledger from its log file
    ///
    /// Each non-blank line, trimmed, is one fetched URL. A missing file
    /// yields an empty ledger rather than an error.
    ///
    /// # Arguments
    ///
    /// * `files` - The filesystem backend
    /// * `path` - Path of the ledger log
    ///
    /// # Returns
    ///
    /// * `Ok(Ledger)` - The recovered ledger
    /// * `Err(StorageError)` - The log exists but could not be read
    pub fn load<F: FileStore>(files: &F, path: impl Into<PathBuf>) -> StorageResult<Self> {
        let mut ledger = Self::new(path);

        if let Some(content) = files.read_to_string(&ledger.path)? {
            ledger.fetched.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }

        Ok(ledger)
    }

    /// Returns true if `url` has already been fetched
    pub fn contains(&self, url: &str) -> bool {
        self.fetched.contains(url)
    }

    /// Records a freshly fetched URL in memory and in the log file
    ///
    /// Recording a URL twice leaves both the set and the log unchanged the
    /// second time.
    pub fn record<F: FileStore>(&mut self, files: &F, url: &str) -> StorageResult<()> {
        if self.contains(url) {
            return Ok(());
        }

        files.append_line(&self.path, url)?;
        self.fetched.insert(url.to_string());
        Ok(())
    }

    /// Marks `url` as fetched in memory only
    ///
    /// Returns true if the URL was not known before.
    pub fn remember(&mut self, url: &str) -> bool {
        self.fetched.insert(url.to_string())
    }

    /// Number of URLs known to be fetched
    pub fn count(&self) -> usize {
        self.fetched.len()
    }

    /// Path of the backing log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
