use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key used by the catalog for name-prefix searches.
pub const PATH_SEARCH_KEY: &str = "??";

/// Key used by the catalog for next-component completion.
pub const COMPLETION_KEY: &str = "?";

/// Filter criteria serialized into a single name component.
///
/// Keys keep insertion order; setting an existing key replaces its value in
/// place. The serialized form is the catalog's cache key, so two specs built
/// the same way always produce byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    entries: Vec<(String, String)>,
}

impl QuerySpec {
    pub fn new() -> Self { Self::default() }

    /// Search for everything under `path`.
    pub fn path(path: impl Into<String>) -> Self { Self::new().with(PATH_SEARCH_KEY, path) }

    /// Ask for the components that may follow `partial`.
    pub fn completion(partial: impl Into<String>) -> Self {
        Self::new().with(COMPLETION_KEY, partial)
    }

    /// Build a filter query from `category:value` labels.
    ///
    /// Only the first `:` separates key from value. Labels without a
    /// separator map to an empty value.
    pub fn from_filters<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels.into_iter().fold(Self::new(), |spec, label| {
            let label = label.as_ref();
            let (key, value) = label.split_once(':').unwrap_or((label, ""));
            spec.with(key, value)
        })
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Compact JSON object text in insertion order.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

impl Serialize for QuerySpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QuerySpec {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |spec, (k, v)| spec.with(k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let spec = QuerySpec::new()
            .with("region", "pacific")
            .with("category", "temperature");
        assert_eq!(spec.to_json(), r#"{"region":"pacific","category":"temperature"}"#);
    }

    #[test]
    fn test_replacing_keeps_position() {
        let spec = QuerySpec::new()
            .with("a", "1")
            .with("b", "2")
            .with("a", "3");
        assert_eq!(spec.to_json(), r#"{"a":"3","b":"2"}"#);
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(QuerySpec::path("/cmip5").to_json(), r#"{"??":"/cmip5"}"#);
        assert_eq!(QuerySpec::completion("/cm").to_json(), r#"{"?":"/cm"}"#);
    }

    #[test]
    fn test_from_filters() {
        let spec = QuerySpec::from_filters(["activity:CMIP5", "time:2010:01", "bare"]);
        assert_eq!(spec.get("activity"), Some("CMIP5"));
        assert_eq!(spec.get("time"), Some("2010:01"));
        assert_eq!(spec.get("bare"), Some(""));
    }

    #[test]
    fn test_json_escaping() {
        let spec = QuerySpec::new().with("q", "say \"hi\"");
        assert_eq!(spec.to_json(), r#"{"q":"say \"hi\""}"#);
    }

    #[test]
    fn test_empty_spec() {
        assert_eq!(QuerySpec::new().to_json(), "{}");
    }
}
