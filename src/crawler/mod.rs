//! Crawler module for sweeping a board section
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded retries
//! - HTML parsing and link extraction
//! - Per-image dedup against the ledger and the disk
//! - The forever-repeating sweep over a section's pages

mod board;
mod fetcher;
mod image;
mod page;
mod parser;
mod scheduler;

pub use board::Board;
pub use fetcher::{
    build_http_client, classify_error, with_retries, FetchOutcome, Fetched, Fetcher,
    HttpTransport, RetryPolicy, Transport,
};
pub use image::ImageTask;
pub use page::{Fetchable, ImageSource, Page, PageKind};
pub use parser::{
    extract_image_links, extract_reply_links, parse_document, sanitize_file_name, ImageLink,
    ReplyLink, MAX_FILE_NAME_BYTES, REPLY_LABEL, REPLY_PATH_PREFIX,
};
pub use scheduler::{Sleeper, TokioSleeper};

use crate::config::Config;
use crate::CrawlError;
use std::convert::Infallible;

/// Sweeps the configured section forever
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Load the ledger of already fetched images
/// 3. Sweep the section's pages and threads, downloading new images
/// 4. Sleep, then sweep again
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// Only ever returns on an unexpected error.
///
/// # Example
///
/// ```no_run
/// use chan_sweeper::config::load_config;
/// use chan_sweeper::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Some("wg"))?;
/// crawl(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<Infallible, CrawlError> {
    let mut board = Board::from_config(config)?;
    board.run_forever().await
}
