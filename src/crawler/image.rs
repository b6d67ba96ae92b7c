//! One candidate image: decide whether it is wanted, then fetch and save it
//!
//! An image is wanted unless the ledger already lists its URL or a file
//! with its name already sits in the section directory. A wanted image is
//! downloaded, written to disk, and only then recorded in the ledger.

use crate::crawler::fetcher::{Fetcher, Transport};
use crate::crawler::parser::ImageLink;
use crate::crawler::scheduler::Sleeper;
use crate::ledger::Ledger;
use crate::state::ImageState;
use crate::storage::FileStore;
use crate::CrawlError;
use std::path::{Path, PathBuf};

/// A discovered image, tied to the ledger of its board
#[derive(Debug)]
pub struct ImageTask<'a> {
    link: ImageLink,
    target: PathBuf,
    ledger: &'a mut Ledger,
    state: ImageState,
}

impl<'a> ImageTask<'a> {
    /// Creates a task saving `link` under `section_dir`
    pub fn new(link: ImageLink, section_dir: &Path, ledger: &'a mut Ledger) -> Self {
        let target = section_dir.join(&link.display_name);
        Self {
            link,
            target,
            ledger,
            state: ImageState::Pending,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.link.source_url
    }

    /// Where the image is written
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn state(&self) -> ImageState {
        self.state
    }

    /// Decides whether the image still needs downloading
    ///
    /// A file already on disk counts as proof of an earlier fetch, so its
    /// URL is remembered in the ledger.
    pub fn is_wanted<F: FileStore>(&mut self, files: &F) -> bool {
        if self.ledger.contains(self.source_url()) {
            tracing::debug!("{} - already fetched", self.source_url());
            self.state = ImageState::AlreadyFetched;
            return false;
        }

        if files.exists(&self.target) {
            tracing::debug!(
                "{} - file exists at {}",
                self.source_url(),
                self.target.display()
            );
            self.ledger.remember(&self.link.source_url);
            self.state = ImageState::FileExists;
            return false;
        }

        true
    }

    /// Fetches and saves the image if it is wanted
    ///
    /// # Returns
    ///
    /// * `Ok(ImageState)` - The terminal state of this task
    /// * `Err(CrawlError)` - An unexpected network failure, or the ledger
    ///   could not be appended to
    ///
    /// An image that downloads but cannot be written ends as
    /// [`ImageState::Failed`] and is left out of the ledger.
    pub async fn fetch_if_wanted<T, Z, F>(
        mut self,
        fetcher: &Fetcher<T, Z>,
        files: &F,
    ) -> Result<ImageState, CrawlError>
    where
        T: Transport,
        Z: Sleeper,
        F: FileStore,
    {
        if !self.is_wanted(files) {
            return Ok(self.state);
        }

        let url = self.link.source_url.as_str();

        self.state = match fetcher.get(url).await? {
            None => ImageState::Abandoned,
            Some(fetched) if !fetched.is_success() => {
                tracing::error!("{} - epic fail (HTTP {})", fetched.url, fetched.status);
                ImageState::Failed
            }
            Some(fetched) => match files.write_file(&self.target, &fetched.body) {
                Err(e) => {
                    tracing::error!("{} - epic fail ({})", url, e);
                    ImageState::Failed
                }
                Ok(()) => {
                    self.ledger.record(files, url)?;
                    tracing::info!("{} - fetched ({} bytes)", url, fetched.body.len());
                    ImageState::Fetched
                }
            },
        };

        Ok(self.state)
    }
}
