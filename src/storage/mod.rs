//! Storage module for persisting crawl data
//!
//! This module handles all filesystem access for the crawler:
//! - Writing downloaded image bytes
//! - Appending to and reading the fetched-URL ledger log
//! - Checking whether an image is already on disk

mod local;
mod traits;

pub use local::LocalFileStore;
pub use traits::{FileStore, StorageError, StorageResult};
