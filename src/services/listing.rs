// src/services/listing.rs

//! Show list discovery.
//!
//! Extracts show page links from the site's show list page.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::utils::resolve;

/// Extract show page URLs from a show list document.
///
/// Every `a[href]` is resolved against `page_url`; links whose resolved
/// URL contains `pattern` are kept, deduplicated in first-seen order.
pub fn extract_show_links(document: &Html, page_url: &str, pattern: &str) -> Result<Vec<String>> {
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| AppError::selector("a[href]", format!("{e:?}")))?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.contains("javascript") || href == "#" {
            continue;
        }
        let Some(full_url) = resolve(page_url, href) else {
            continue;
        };
        if !full_url.contains(pattern) {
            continue;
        }
        if seen.insert(full_url.clone()) {
            links.push(full_url);
        }
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The fixture contains a bare `href="#"`, so the raw string needs
    // double-hash delimiters.
    const LIST_PAGE: &str = r##"
        <html><body>
        <table>
            <tr><td><a href="/shows/1-first-show/">First Show</a></td></tr>
            <tr><td><a href="/shows/2-second-show/">Second Show</a></td></tr>
            <tr><td><a href="/shows/1-first-show/">First Show again</a></td></tr>
            <tr><td><a href="https://eztv.ag/shows/3-third-show/">Third Show</a></td></tr>
            <tr><td><a href="/faq/">FAQ</a></td></tr>
            <tr><td><a href="#">Top</a></td></tr>
            <tr><td><a href="javascript:void(0)">Menu</a></td></tr>
        </table>
        </body></html>
    "##;

    #[test]
    fn test_extracts_and_resolves_show_links() {
        let document = Html::parse_document(LIST_PAGE);
        let links =
            extract_show_links(&document, "https://eztv.ag/showlist/", "/shows/").unwrap();

        assert_eq!(
            links,
            vec![
                "https://eztv.ag/shows/1-first-show/".to_string(),
                "https://eztv.ag/shows/2-second-show/".to_string(),
                "https://eztv.ag/shows/3-third-show/".to_string(),
            ]
        );
    }

    #[test]
    fn test_ignores_non_matching_links() {
        let document = Html::parse_document(LIST_PAGE);
        let links =
            extract_show_links(&document, "https://eztv.ag/showlist/", "/shows/").unwrap();
        assert!(links.iter().all(|l| l.contains("/shows/")));
    }

    #[test]
    fn test_empty_document_yields_no_links() {
        let document = Html::parse_document("<html><body></body></html>");
        let links =
            extract_show_links(&document, "https://eztv.ag/showlist/", "/shows/").unwrap();
        assert!(links.is_empty());
    }
}
