//! HTML parser for extracting image and reply links
//!
//! Board markup marks the link to a full-size image by wrapping it in a
//! `span.filesize` annotation, and links each thread through an anchor
//! labelled "Reply" pointing below `res/`.

use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Path prefix of reply-thread links
pub const REPLY_PATH_PREFIX: &str = "res/";

/// Visible text of a reply-thread link
pub const REPLY_LABEL: &str = "Reply";

/// Link to a full-size image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    /// Absolute URL of the image, also its ledger key
    pub source_url: String,

    /// File name the image is saved under
    pub display_name: String,
}

/// Link to a reply thread, relative to the section root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyLink {
    pub relative_path: String,
}

/// Parses a page body into a document
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Extracts image links in document order
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `page_url` - URL the page was fetched from, for resolving relative hrefs
///
/// # Example
///
/// ```
/// use chan_sweeper::crawler::{extract_image_links, parse_document};
/// use url::Url;
///
/// let html = r#"<span class="filesize">File: <a href="/src/1.jpg">cat.jpg</a></span>"#;
/// let page = Url::parse("http://cgi.4chan.org/s/").unwrap();
/// let links = extract_image_links(&parse_document(html), &page);
/// assert_eq!(links[0].source_url, "http://cgi.4chan.org/src/1.jpg");
/// assert_eq!(links[0].display_name, "cat.jpg");
/// ```
pub fn extract_image_links(document: &Html, page_url: &Url) -> Vec<ImageLink> {
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("span.filesize a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let Some(source_url) = resolve_link(href, page_url) else {
                tracing::debug!("Skipping unusable image href {:?}", href);
                continue;
            };

            match display_name(&element_text(&element), &source_url) {
                Some(display_name) => links.push(ImageLink {
                    source_url,
                    display_name,
                }),
                None => tracing::debug!("No usable file name for {}", source_url),
            }
        }
    }

    links
}

/// Extracts reply-thread links in document order
///
/// Only anchors whose href starts with `res/` and whose text is exactly
/// "Reply" count; quote links into the same threads are ignored.
pub fn extract_reply_links(document: &Html) -> Vec<ReplyLink> {
    let mut links = Vec::new();
    let query = format!("a[href^='{}']", REPLY_PATH_PREFIX);

    if let Ok(selector) = Selector::parse(&query) {
        for element in document.select(&selector) {
            if element_text(&element) != REPLY_LABEL {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                links.push(ReplyLink {
                    relative_path: href.to_string(),
                });
            }
        }
    }

    links
}

/// Longest file name, in bytes, that common filesystems accept
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Longest suffix after the last dot that is kept as an extension
const MAX_EXTENSION_BYTES: usize = 16;

/// Reduces a raw name to a single safe path component
///
/// Names longer than [`MAX_FILE_NAME_BYTES`] are shortened, keeping the
/// extension. Returns None for names that are empty or would escape the
/// directory.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(truncate_file_name(name))
    }
}

fn truncate_file_name(name: &str) -> String {
    if name.len() <= MAX_FILE_NAME_BYTES {
        return name.to_string();
    }

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_BYTES => name.split_at(dot),
        _ => (name, ""),
    };

    let mut end = MAX_FILE_NAME_BYTES - extension.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{}", &stem[..end], extension)
}

/// Picks the file name: the link text, else the last URL path segment
fn display_name(text: &str, source_url: &str) -> Option<String> {
    sanitize_file_name(text).or_else(|| {
        let url = Url::parse(source_url).ok()?;
        let last = url.path_segments()?.last()?;
        sanitize_file_name(last)
    })
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}
