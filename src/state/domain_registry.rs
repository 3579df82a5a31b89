use crate::url::extract_domain;
use std::collections::HashSet;
use std::sync::Mutex;
use url::Url;

/// Process-wide record of domains already dispatched for fetching
///
/// A domain is claimed at most once per run: the first caller to present a
/// URL on a given domain wins, every later caller is told to skip it. The
/// registry only grows; nothing is ever released, so a domain that yielded
/// no contacts is still never fetched again.
///
/// The lock is held for the check-and-insert only, never across a network
/// call.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    claimed: Mutex<HashSet<String>>,
}

impl DomainRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim the domain of `url` for this caller
    ///
    /// # Returns
    ///
    /// * `true` - The domain was unclaimed and now belongs to this caller
    /// * `false` - The domain was already claimed, or the URL has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use contact_harvest::state::DomainRegistry;
    /// use url::Url;
    ///
    /// let registry = DomainRegistry::new();
    /// let contact = Url::parse("https://a.fr/contact").unwrap();
    /// let about = Url::parse("https://a.fr/about").unwrap();
    ///
    /// assert!(registry.try_claim(&contact));
    /// assert!(!registry.try_claim(&about));
    /// ```
    pub fn try_claim(&self, url: &Url) -> bool {
        let Some(domain) = extract_domain(url) else {
            return false;
        };

        let mut claimed = self.lock();
        claimed.insert(domain)
    }

    /// Number of domains claimed so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A poisoned set is still a valid set: inserts are single operations
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
