use url::Url;

/// Extracts the network domain from a URL
///
/// The domain is the lowercase host, followed by `:port` when the URL names
/// an explicit port that differs from the scheme default. Two URLs with the
/// same domain are treated as the same site by the domain registry.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The domain
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use contact_harvest::url::extract_domain;
///
/// let url = Url::parse("https://example.fr/contact").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.fr".to_string()));
///
/// let url = Url::parse("https://EXAMPLE.FR/about").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.fr".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();

    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
