//! Contact extraction from fetched pages
//!
//! Pages are first rendered into a flat scan text: every attribute value and
//! every non-blank text node of the parsed document, one per line, in
//! document order. Phone numbers and email addresses are then found by
//! pattern matching over that text. No structure-aware scraping is done.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};
use std::collections::HashSet;

/// French national format: `0X XX XX XX XX`
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0\d(?: \d{2}){4}").expect("phone pattern compiles"));

/// Local part, `@` or the obfuscated `[a]`, domain, dot, suffix
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w.-]+(?:@|\[a\])[\w.-]+\.\w+").expect("email pattern compiles")
});

/// Phone numbers and email addresses found on one page
///
/// Each list holds unique values in the order of their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContacts {
    pub phone_numbers: Vec<String>,
    pub email_addresses: Vec<String>,
}

impl ExtractedContacts {
    pub fn is_empty(&self) -> bool {
        self.phone_numbers.is_empty() && self.email_addresses.is_empty()
    }
}

/// Pattern-based phone and email extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactExtractor;

impl ContactExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts contacts from raw page markup
    ///
    /// Never fails: a page without matches yields two empty lists.
    ///
    /// # Example
    ///
    /// ```
    /// use contact_harvest::pipeline::ContactExtractor;
    ///
    /// let html = r#"<p>Contactez-nous au 01 23 45 67 89</p>"#;
    /// let contacts = ContactExtractor::new().extract(html);
    /// assert_eq!(contacts.phone_numbers, vec!["01 23 45 67 89".to_string()]);
    /// assert!(contacts.email_addresses.is_empty());
    /// ```
    pub fn extract(&self, html: &str) -> ExtractedContacts {
        self.extract_from_text(&render_scan_text(html))
    }

    /// Extracts contacts from already rendered text
    pub fn extract_from_text(&self, text: &str) -> ExtractedContacts {
        ExtractedContacts {
            phone_numbers: unique_in_order(PHONE_PATTERN.find_iter(text).map(|m| m.as_str())),
            email_addresses: unique_in_order(EMAIL_PATTERN.find_iter(text).map(|m| m.as_str())),
        }
    }
}

/// Renders markup into the flat text scanned for contacts
pub fn render_scan_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Element(element) => {
                lines.extend(
                    element
                        .attrs()
                        .map(|(_, value)| value.trim())
                        .filter(|value| !value.is_empty()),
                );
            }
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    lines.push(text);
                }
            }
            Node::Comment(comment) => {
                let comment = comment.trim();
                if !comment.is_empty() {
                    lines.push(comment);
                }
            }
            _ => {}
        }
    }

    lines.join("\n")
}

fn unique_in_order<'a>(matches: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    matches
        .filter(|m| seen.insert(*m))
        .map(str::to_string)
        .collect()
}
