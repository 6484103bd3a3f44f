//! In-memory query cache keyed by request fingerprint.

use std::collections::HashMap;
use std::sync::Arc;

use md5::{Digest, Md5};

use super::xml::XmlElement;

/// Computes the cache fingerprint (MD5 hex digest) of a full request URL.
#[must_use]
pub fn fingerprint(query: &str) -> String {
    format!("{:x}", Md5::digest(query.as_bytes()))
}

/// Unbounded memo of parsed documents for the lifetime of a client.
///
/// There is no eviction and no TTL.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct QueryCache {
    entries: HashMap<String, Arc<XmlElement>>,
}

impl QueryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document for the query, overwriting any previous entry.
    pub fn put(&mut self, query: &str, document: Arc<XmlElement>) {
        self.entries.insert(fingerprint(query), document);
    }

    /// Returns the stored document for the query.
    ///
    /// A stored document that is empty (see [`XmlElement::is_empty`]) is
    /// reported as absent, so the caller fetches it again.
    #[must_use]
    pub fn get(&self, query: &str) -> Option<Arc<XmlElement>> {
        self.entries
            .get(&fingerprint(query))
            .filter(|doc| !doc.is_empty())
            .cloned()
    }

    /// Number of stored entries, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
