//! Board crawl loop
//!
//! A [`Board`] owns everything one section needs: its configuration, the
//! retrying fetcher, the filesystem, and the ledger that every image task of
//! the section is checked against. One sweep walks the index pages in order;
//! on each page it fetches the page's images, then every reply thread and
//! that thread's images. Sweeps repeat forever with a fixed pause between
//! them.

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpTransport, RetryPolicy, Transport};
use crate::crawler::image::ImageTask;
use crate::crawler::page::{Fetchable, ImageSource, Page};
use crate::crawler::scheduler::{Sleeper, TokioSleeper};
use crate::ledger::Ledger;
use crate::output::SweepStats;
use crate::storage::{FileStore, LocalFileStore};
use crate::url::{board_page_url, thread_url};
use crate::CrawlError;
use std::convert::Infallible;
use url::Url;

/// One board section and its crawl state
pub struct Board<T, Z, F> {
    config: Config,
    fetcher: Fetcher<T, Z>,
    sleeper: Z,
    files: F,
    ledger: Ledger,
    page: Option<u32>,
}

impl Board<HttpTransport, TokioSleeper, LocalFileStore> {
    /// Creates a board that talks HTTP and writes to the local disk
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Board)` - Ready to [`run_forever`](Board::run_forever)
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn from_config(config: Config) -> Result<Self, CrawlError> {
        let transport = HttpTransport::from_config(&config.http)?;
        Ok(Self::new(config, transport, TokioSleeper, LocalFileStore))
    }
}

impl<T, Z, F> Board<T, Z, F>
where
    T: Transport,
    Z: Sleeper + Clone,
    F: FileStore,
{
    /// Creates a board from its collaborators
    ///
    /// The ledger starts empty; [`startup`](Board::startup) loads it.
    pub fn new(config: Config, transport: T, sleeper: Z, files: F) -> Self {
        let fetcher = Fetcher::new(transport, sleeper.clone(), RetryPolicy::from(&config.http));
        let ledger = Ledger::new(config.ledger_path());

        Self {
            config,
            fetcher,
            sleeper,
            files,
            ledger,
            page: None,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Index page currently being visited, unset between sweeps
    pub fn current_page(&self) -> Option<u32> {
        self.page
    }

    /// URL of the current index page (page 1 when unset)
    pub fn page_url(&self) -> Result<Url, CrawlError> {
        Ok(board_page_url(
            &self.config.board.base_url,
            &self.config.board.section,
            self.page.unwrap_or(1),
        )?)
    }

    /// Loads the ledger from its log file
    ///
    /// # Returns
    ///
    /// The number of URLs remembered from earlier runs
    pub fn startup(&mut self) -> Result<usize, CrawlError> {
        self.ledger = Ledger::load(&self.files, self.config.ledger_path())?;
        tracing::info!(
            "Remembered {} images for /{}/ from {}",
            self.ledger.count(),
            self.config.board.section,
            self.ledger.path().display()
        );

        let policy = self.fetcher.policy();
        tracing::debug!(
            "Giving up on a fetch after {} attempts, backing off {:?} per attempt",
            policy.max_attempts,
            policy.backoff
        );
        Ok(self.ledger.count())
    }

    /// Performs one sweep over all index pages and their threads
    ///
    /// Pages, threads and images that cannot be fetched are skipped; only
    /// unexpected errors end the sweep.
    pub async fn sweep(&mut self) -> Result<SweepStats, CrawlError> {
        let mut stats = SweepStats::start();
        self.page = None;

        for _ in 0..self.config.board.max_pages {
            let number = self.next_page();
            let mut page = Page::board(self.page_url()?, number);

            let fetched = page.fetch(&self.fetcher).await?;
            stats.record_page(fetched);

            self.fetch_images(&page, &mut stats).await?;
            self.fetch_replies(&page, &mut stats).await?;
        }

        stats.finish();
        stats.log_summary(&self.config.board.section);
        Ok(stats)
    }

    /// Loads the ledger, then runs `count` sweeps with the usual pause after each
    pub async fn run_sweeps(&mut self, count: usize) -> Result<Vec<SweepStats>, CrawlError> {
        self.startup()?;

        let mut all = Vec::with_capacity(count);
        for _ in 0..count {
            all.push(self.sweep_and_wait().await?);
        }
        Ok(all)
    }

    /// Loads the ledger, then sweeps until an unexpected error occurs
    pub async fn run_forever(&mut self) -> Result<Infallible, CrawlError> {
        self.startup()?;

        loop {
            self.sweep_and_wait().await?;
        }
    }

    async fn sweep_and_wait(&mut self) -> Result<SweepStats, CrawlError> {
        let stats = self.sweep().await?;
        tracing::debug!(
            "Sleeping {:?} before the next sweep",
            self.config.schedule.sweep_interval
        );
        self.sleeper.sleep(self.config.schedule.sweep_interval).await;
        Ok(stats)
    }

    fn next_page(&mut self) -> u32 {
        let next = self.page.map_or(1, |page| page + 1);
        self.page = Some(next);
        tracing::debug!("next page => {}", next);
        next
    }

    async fn fetch_images<S: ImageSource>(
        &mut self,
        source: &S,
        stats: &mut SweepStats,
    ) -> Result<(), CrawlError> {
        let section_dir = self.config.section_dir();

        for link in source.image_links() {
            let task = ImageTask::new(link, &section_dir, &mut self.ledger);
            let state = task.fetch_if_wanted(&self.fetcher, &self.files).await?;
            stats.record_image(state);
        }

        Ok(())
    }

    async fn fetch_replies(&mut self, page: &Page, stats: &mut SweepStats) -> Result<(), CrawlError> {
        for reply in page.reply_links() {
            let url = thread_url(
                &self.config.board.base_url,
                &self.config.board.section,
                &reply.relative_path,
            )?;
            let mut thread = Page::thread(url);

            let fetched = thread.fetch(&self.fetcher).await?;
            stats.record_thread(fetched);

            self.fetch_images(&thread, stats).await?;
        }

        Ok(())
    }
}
