//! Postal code reference data
//!
//! The run is driven by a static mapping from French postal code to commune
//! name, loaded once at startup and read-only afterwards.

mod loader;

pub use loader::{load_postal_codes, parse_postal_codes};

use std::collections::HashMap;

/// One postal code and the commune it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCodeEntry {
    pub postal_code: String,
    pub commune_name: String,
}

/// Ordered set of postal codes with unique keys
///
/// Entries keep the order in which each postal code was first seen. Inserting
/// a postal code that is already present replaces its commune name.
#[derive(Debug, Clone, Default)]
pub struct PostalCodeDirectory {
    entries: Vec<PostalCodeEntry>,
    index: HashMap<String, usize>,
}

impl PostalCodeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the commune for `postal_code`
    pub fn insert(&mut self, postal_code: impl Into<String>, commune_name: impl Into<String>) {
        let postal_code = postal_code.into();
        let commune_name = commune_name.into();

        match self.index.get(&postal_code) {
            Some(&position) => self.entries[position].commune_name = commune_name,
            None => {
                self.index.insert(postal_code.clone(), self.entries.len());
                self.entries.push(PostalCodeEntry {
                    postal_code,
                    commune_name,
                });
            }
        }
    }

    /// Looks up the commune name for a postal code
    pub fn commune(&self, postal_code: &str) -> Option<&str> {
        self.index
            .get(postal_code)
            .map(|&position| self.entries[position].commune_name.as_str())
    }

    pub fn entries(&self) -> &[PostalCodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for PostalCodeDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut directory = Self::new();
        for (postal_code, commune_name) in iter {
            directory.insert(postal_code, commune_name);
        }
        directory
    }
}

impl IntoIterator for PostalCodeDirectory {
    type Item = PostalCodeEntry;
    type IntoIter = std::vec::IntoIter<PostalCodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
