use url::Url;

/// Resolves a link href against the page it was found on
///
/// Returns None if the link cannot be fetched as an image:
/// - empty or fragment-only hrefs
/// - `javascript:`, `mailto:`, `data:` and other non-HTTP(S) schemes
/// - hrefs that do not parse
///
/// # Examples
///
/// ```
/// use chan_sweeper::url::resolve_link;
/// use url::Url;
///
/// let page = Url::parse("http://cgi.4chan.org/s/").unwrap();
/// assert_eq!(
///     resolve_link("//images.4chan.org/s/src/1.jpg", &page).as_deref(),
///     Some("http://images.4chan.org/s/src/1.jpg")
/// );
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
