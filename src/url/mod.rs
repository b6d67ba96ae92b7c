//! URL handling module for Chan-Sweeper
//!
//! This module builds the fixed board URL templates and resolves the links
//! found on board pages into absolute URLs.
//!
//! | Target | URL |
//! |--------|-----|
//! | Board page 1 | `<base>/<section>/` |
//! | Board page n > 1 | `<base>/<section>/<n>.html` |
//! | Reply thread | `<base>/<section>/<href>` |

mod resolve;

pub use resolve::resolve_link;

use url::{ParseError, Url};

/// Returns the root URL of a section, always ending in `/`
///
/// # Examples
///
/// ```
/// use chan_sweeper::url::section_root;
/// use url::Url;
///
/// let base = Url::parse("http://cgi.4chan.org").unwrap();
/// assert_eq!(section_root(&base, "s").unwrap().as_str(), "http://cgi.4chan.org/s/");
/// ```
pub fn section_root(base_url: &Url, section: &str) -> Result<Url, ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("{}/", section))
}

/// Returns the URL of a board index page
///
/// Page 1 is the section root; later pages are `<n>.html` under it.
pub fn board_page_url(base_url: &Url, section: &str, page: u32) -> Result<Url, ParseError> {
    let root = section_root(base_url, section)?;
    if page > 1 {
        root.join(&format!("{}.html", page))
    } else {
        Ok(root)
    }
}

/// Returns the URL of a reply thread from the relative path of its link
pub fn thread_url(base_url: &Url, section: &str, relative_path: &str) -> Result<Url, ParseError> {
    section_root(base_url, section)?.join(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://cgi.4chan.org/").unwrap()
    }

    #[test]
    fn test_first_page_is_section_root() {
        let url = board_page_url(&base(), "s", 1).unwrap();
        assert_eq!(url.as_str(), "http://cgi.4chan.org/s/");
    }

    #[test]
    fn test_later_pages() {
        let url = board_page_url(&base(), "s", 2).unwrap();
        assert_eq!(url.as_str(), "http://cgi.4chan.org/s/2.html");

        let url = board_page_url(&base(), "wg", 10).unwrap();
        assert_eq!(url.as_str(), "http://cgi.4chan.org/wg/10.html");
    }

    #[test]
    fn test_page_zero_is_section_root() {
        let url = board_page_url(&base(), "s", 0).unwrap();
        assert_eq!(url.as_str(), "http://cgi.4chan.org/s/");
    }

    #[test]
    fn test_thread_url() {
        let url = thread_url(&base(), "s", "res/123").unwrap();
        assert_eq!(url.as_str(), "http://cgi.4chan.org/s/res/123");
    }

    #[test]
    fn test_base_with_path_without_trailing_slash() {
        let base = Url::parse("http://localhost:8080/mirror").unwrap();
        let url = board_page_url(&base, "s", 3).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/mirror/s/3.html");
    }
}
