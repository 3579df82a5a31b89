use serde::{Deserialize, Serialize};

/// Separator used when a list of phones or emails is rendered into one field
pub const LIST_SEPARATOR: &str = ", ";

/// Contact data found on a single candidate page
///
/// A record only exists when at least one phone number or email address was
/// found. Both lists hold unique values in the order they first appeared on
/// the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub url: String,
    pub commune: String,
    pub postal_code: String,
    pub phone_numbers: Vec<String>,
    pub email_addresses: Vec<String>,
}

/// Flat CSV representation of a record
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CsvRow {
    pub url: String,
    pub commune: String,
    pub postal_code: String,
    pub phone_numbers: String,
    pub email_addresses: String,
}

impl ContactRecord {
    /// Builds a record, or `None` when neither list has any entry
    pub fn new(
        url: impl Into<String>,
        commune: impl Into<String>,
        postal_code: impl Into<String>,
        phone_numbers: Vec<String>,
        email_addresses: Vec<String>,
    ) -> Option<Self> {
        if phone_numbers.is_empty() && email_addresses.is_empty() {
            return None;
        }

        Some(Self {
            url: url.into(),
            commune: commune.into(),
            postal_code: postal_code.into(),
            phone_numbers,
            email_addresses,
        })
    }

    /// Phone numbers rendered as a single `", "`-joined field
    pub fn phone_field(&self) -> String {
        self.phone_numbers.join(LIST_SEPARATOR)
    }

    /// Email addresses rendered as a single `", "`-joined field
    pub fn email_field(&self) -> String {
        self.email_addresses.join(LIST_SEPARATOR)
    }

    pub(crate) fn to_row(&self) -> CsvRow {
        CsvRow {
            url: self.url.clone(),
            commune: self.commune.clone(),
            postal_code: self.postal_code.clone(),
            phone_numbers: self.phone_field(),
            email_addresses: self.email_field(),
        }
    }

    pub(crate) fn from_row(row: CsvRow) -> Self {
        Self {
            url: row.url,
            commune: row.commune,
            postal_code: row.postal_code,
            phone_numbers: split_list(&row.phone_numbers),
            email_addresses: split_list(&row.email_addresses),
        }
    }
}

fn split_list(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split(LIST_SEPARATOR).map(str::to_string).collect()
}
