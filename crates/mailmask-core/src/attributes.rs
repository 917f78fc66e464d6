//! Element attribute storage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordered attribute list of a single element.
///
/// Names are stored lowercased and looked up ASCII case-insensitively, the
/// way HTML attribute names behave. Source order is preserved and the first
/// occurrence of a duplicated name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Create an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value, `None` if the attribute is absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get an attribute value, reading a missing attribute as the empty string.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Whether the attribute is present (with any value, including empty).
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an attribute, replacing an existing value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Insert an attribute only if it is not already present.
    ///
    /// Parsers use this so a duplicated attribute keeps its first value.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        if !self.contains(&name) {
            self.0.push((name, value.into()));
        }
    }

    /// Whitespace-separated class tokens.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_or_empty("class").split_ascii_whitespace()
    }

    /// Whether the `class` attribute contains the given token.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Append a class token if it is not already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let current = self.get_or_empty("class").trim();
        let updated = if current.is_empty() {
            class.to_string()
        } else {
            format!("{current} {class}")
        };
        self.set("class", updated);
    }

    /// Iterate over `(name, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.insert_if_absent(name, value);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let attrs: Attributes = [("ID", "email"), ("Name", "user")].into_iter().collect();
        assert_eq!(attrs.get("id"), Some("email"));
        assert_eq!(attrs.get("NAME"), Some("user"));
        assert_eq!(attrs.get("placeholder"), None);
    }

    #[test]
    fn test_missing_reads_as_empty() {
        let attrs = Attributes::new();
        assert_eq!(attrs.get_or_empty("autocomplete"), "");
        assert!(!attrs.contains("autocomplete"));
    }

    #[test]
    fn test_empty_value_is_present() {
        let attrs: Attributes = [("type", "")].into_iter().collect();
        assert!(attrs.contains("type"));
        assert_eq!(attrs.get("type"), Some(""));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let attrs: Attributes = [("id", "first"), ("id", "second")].into_iter().collect();
        assert_eq!(attrs.get("id"), Some("first"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_set_replaces() {
        let mut attrs: Attributes = [("id", "a")].into_iter().collect();
        attrs.set("ID", "b");
        assert_eq!(attrs.get("id"), Some("b"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_add_class() {
        let mut attrs = Attributes::new();
        attrs.add_class("marked");
        assert_eq!(attrs.get("class"), Some("marked"));

        attrs.add_class("marked");
        assert_eq!(attrs.get("class"), Some("marked"));

        attrs.set("class", "  form-control ");
        attrs.add_class("marked");
        assert_eq!(attrs.get("class"), Some("form-control marked"));
        assert!(attrs.has_class("form-control"));
        assert!(attrs.has_class("marked"));
        assert!(!attrs.has_class("form"));
    }
}
