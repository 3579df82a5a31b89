use url::Url;

/// Checks whether a link points at a non-HTML document that is never fetched
///
/// Both the raw link and its parsed path are compared against each
/// extension (e.g. `.pdf`), ignoring ASCII case. A link is excluded when
/// either one ends with the extension.
///
/// # Examples
///
/// ```
/// use contact_harvest::url::is_excluded_document;
///
/// let excluded = vec![".pdf".to_string()];
/// assert!(is_excluded_document("https://example.fr/brochure.pdf", &excluded));
/// assert!(is_excluded_document("https://example.fr/TARIFS.PDF", &excluded));
/// assert!(!is_excluded_document("https://example.fr/contact", &excluded));
/// ```
pub fn is_excluded_document(link: &str, extensions: &[String]) -> bool {
    let raw = link.trim().to_ascii_lowercase();
    let path = Url::parse(&raw).ok().map(|url| url.path().to_string());

    extensions.iter().any(|extension| {
        let extension = extension.to_ascii_lowercase();
        raw.ends_with(&extension)
            || path
                .as_deref()
                .is_some_and(|path| path.ends_with(&extension))
    })
}
