// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// # Examples
/// ```
/// use url::Url;
/// use showscrape::utils::url::resolve_url;
///
/// let base = Url::parse("https://eztv.ag/showlist/").unwrap();
/// assert_eq!(
///     resolve_url(&base, "/shows/1-example/"),
///     "https://eztv.ag/shows/1-example/"
/// );
/// ```
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve a URL string against a base URL string.
///
/// Returns `None` when the base itself does not parse.
pub fn resolve(base_url: &str, href: &str) -> Option<String> {
    Url::parse(base_url)
        .ok()
        .map(|base| resolve_url(&base, href))
}
