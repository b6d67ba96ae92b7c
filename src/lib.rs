//! Chan-Sweeper: a recurring image-board crawler
//!
//! This crate repeatedly polls the pages of one image-board section, follows
//! reply threads, and downloads every linked image that has not been fetched
//! before. A per-section ledger of fetched URLs survives restarts.

pub mod config;
pub mod crawler;
pub mod ledger;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Chan-Sweeper operations
///
/// Expected network failures (timeouts, vanished threads) never show up here;
/// they are absorbed by the retrying fetcher. Everything in this enum is
/// fatal for the running crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME is not set, cannot locate the image directory")]
    MissingHome,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(#[from] ::url::ParseError),
}

/// Result type alias for Chan-Sweeper operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Board};
pub use ledger::Ledger;
pub use state::ImageState;
