//! Per-call query options.

use std::fmt;

/// Ordered mapping of query option names to scalar values.
///
/// Keys are not validated; the remote service decides which ones it
/// understands (`first`, `limit`, `filter`, `lastModified`, `quarter`, ...).
/// Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    entries: Vec<(String, String)>,
}

impl QueryOptions {
    /// Creates an empty option set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets an option, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(key, value);
        self
    }

    /// Sets an option. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        let key = key.into();
        let value = value.to_string();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes as `&k1=v1&k2=v2`, verbatim and in insertion order.
    ///
    /// Returns an empty string when no options are set.
    #[must_use]
    pub fn to_query_suffix(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("&{k}={v}"))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryOptions
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (k, v) in iter {
            options.set(k, v);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_produce_empty_suffix() {
        // Arrange & Act
        let options = QueryOptions::new();

        // Assert
        assert!(options.is_empty());
        assert_eq!(options.to_query_suffix(), "");
    }

    #[test]
    fn test_suffix_keeps_insertion_order() {
        // Arrange
        let options = QueryOptions::new().with("limit", 10).with("first", 0);

        // Act
        let suffix = options.to_query_suffix();

        // Assert
        assert_eq!(suffix, "&limit=10&first=0");
    }

    #[test]
    fn test_values_are_not_encoded() {
        // Arrange
        let options = QueryOptions::new()
            .with("filter", "title;description")
            .with("lastModified", "2010-09-01 10:00");

        // Act
        let suffix = options.to_query_suffix();

        // Assert
        assert_eq!(suffix, "&filter=title;description&lastModified=2010-09-01 10:00");
    }

    #[test]
    fn test_empty_value_is_included_literally() {
        // Arrange & Act
        let options = QueryOptions::new().with("filter", "");

        // Assert
        assert_eq!(options.to_query_suffix(), "&filter=");
    }

    #[test]
    fn test_set_existing_key_replaces_in_place() {
        // Arrange
        let mut options = QueryOptions::new().with("first", 0).with("limit", 10);

        // Act
        options.set("first", 50);

        // Assert
        assert_eq!(options.len(), 2);
        assert_eq!(options.get("first"), Some("50"));
        assert_eq!(options.to_query_suffix(), "&first=50&limit=10");
    }

    #[test]
    fn test_from_iterator() {
        // Arrange & Act
        let options: QueryOptions = [("quarter", 1), ("first", 0)].into_iter().collect();

        // Assert
        assert_eq!(
            options.iter().collect::<Vec<_>>(),
            vec![("quarter", "1"), ("first", "0")]
        );
    }
}
