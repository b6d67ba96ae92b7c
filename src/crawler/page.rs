//! Board and thread pages
//!
//! A page is fetched once and then queried for its links. A page whose
//! fetch was given up has no document and simply yields no links.

use crate::crawler::fetcher::{Fetcher, Transport};
use crate::crawler::parser::{
    extract_image_links, extract_reply_links, parse_document, ImageLink, ReplyLink,
};
use crate::crawler::scheduler::Sleeper;
use crate::CrawlError;
use scraper::Html;
use std::fmt;
use url::Url;

/// Something that is fetched through the retrying fetcher
#[allow(async_fn_in_trait)]
pub trait Fetchable {
    /// URL this item is fetched from
    fn url(&self) -> &Url;

    /// Fetches the item
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The item was fetched
    /// * `Ok(false)` - The fetch was given up; the reason has been logged
    /// * `Err(CrawlError)` - An unexpected failure
    async fn fetch<T: Transport, Z: Sleeper>(
        &mut self,
        fetcher: &Fetcher<T, Z>,
    ) -> Result<bool, CrawlError>;
}

/// Something that links to images
pub trait ImageSource {
    /// Image links in document order
    fn image_links(&self) -> Vec<ImageLink>;
}

/// Which kind of page this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// One of the section's index pages (1-based)
    Board { number: u32 },

    /// A reply thread
    Thread,
}

/// A fetched (or not yet fetched) board or thread page
pub struct Page {
    url: Url,
    kind: PageKind,
    document: Option<Html>,
}

impl Page {
    /// Creates an unfetched index page
    pub fn board(url: Url, number: u32) -> Self {
        Self::new(url, PageKind::Board { number })
    }

    /// Creates an unfetched reply-thread page
    pub fn thread(url: Url) -> Self {
        Self::new(url, PageKind::Thread)
    }

    fn new(url: Url, kind: PageKind) -> Self {
        Self {
            url,
            kind,
            document: None,
        }
    }

    /// Creates a page from an already downloaded body
    pub fn from_body(url: Url, kind: PageKind, body: &str) -> Self {
        Self {
            url,
            kind,
            document: Some(parse_document(body)),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// Returns true if the page was fetched and parsed
    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Reply-thread links in document order; empty without a document
    pub fn reply_links(&self) -> Vec<ReplyLink> {
        self.document
            .as_ref()
            .map(extract_reply_links)
            .unwrap_or_default()
    }
}

impl Fetchable for Page {
    fn url(&self) -> &Url {
        &self.url
    }

    async fn fetch<T: Transport, Z: Sleeper>(
        &mut self,
        fetcher: &Fetcher<T, Z>,
    ) -> Result<bool, CrawlError> {
        match fetcher.get_document(self.url.as_str()).await? {
            Some(body) => {
                *self = Self::from_body(self.url.clone(), self.kind, &body);
                tracing::info!("{} - fetched. Now the images..", self);
                Ok(true)
            }
            None => {
                self.document = None;
                Ok(false)
            }
        }
    }
}

impl ImageSource for Page {
    fn image_links(&self) -> Vec<ImageLink> {
        self.document
            .as_ref()
            .map(|document| extract_image_links(document, &self.url))
            .unwrap_or_default()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PageKind::Board { number } => write!(f, "page {} ({})", number, self.url),
            PageKind::Thread => write!(f, "thread {}", self.url),
        }
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url.as_str())
            .field("kind", &self.kind)
            .field("has_document", &self.has_document())
            .finish()
    }
}
