//! URL handling module for Contact-Harvest
//!
//! This module provides candidate URL parsing, domain extraction, and the
//! document-extension filter applied before any page is fetched.

mod domain;
mod filter;

use crate::UrlError;
use ::url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use filter::is_excluded_document;

/// Parses a search result link into a fetchable URL
///
/// Only HTTP and HTTPS URLs with a host are accepted. Unlike a crawler
/// frontier, search result links are not normalized: the link is fetched
/// exactly as the search service returned it.
///
/// # Arguments
///
/// * `link` - The raw link string from a search result
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The link is malformed, has another scheme, or has no host
///
/// # Examples
///
/// ```
/// use contact_harvest::url::parse_candidate_url;
///
/// let url = parse_candidate_url("https://example.fr/contact").unwrap();
/// assert_eq!(url.host_str(), Some("example.fr"));
///
/// assert!(parse_candidate_url("mailto:contact@example.fr").is_err());
/// assert!(parse_candidate_url("not a url").is_err());
/// ```
pub fn parse_candidate_url(link: &str) -> Result<Url, UrlError> {
    let url = Url::parse(link.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
