//! Ordered, immutable component sequences.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::component::Component;
use crate::error::{NameError, Result};

/// A hierarchical identifier.
///
/// Names are immutable: [`Name::append`] and friends return a new value and
/// leave the receiver untouched. Equality is structural.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Name {
    components: Arc<[Component]>,
}

impl Name {
    pub fn new() -> Self { Self::default() }

    /// Parse the URI form, e.g. `/catalog/query/%7B%7D`.
    ///
    /// A leading `ndn:` scheme is accepted and ignored. Empty path segments
    /// are skipped, so `//a///b` is the same name as `/a/b`.
    pub fn parse(uri: &str) -> Result<Self> {
        let trimmed = uri.trim();
        let path = trimmed.strip_prefix("ndn:").unwrap_or(trimmed);
        if !path.is_empty() && !path.starts_with('/') {
            return Err(NameError::InvalidUri(uri.to_string()));
        }

        let components = path
            .split('/')
            .filter(|part| !part.is_empty())
            .map(|part| Component::new(percent_decode_str(part).collect::<Vec<u8>>()))
            .collect::<Vec<_>>();

        Ok(Self::from_components(components))
    }

    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Return a new name with `component` added at the end.
    #[must_use]
    pub fn append(&self, component: impl Into<Component>) -> Self {
        let mut components = self.components.to_vec();
        components.push(component.into());
        Self::from_components(components)
    }

    /// Return a new name with every component of `other` added at the end.
    #[must_use]
    pub fn extend(&self, other: &Name) -> Self {
        Self::from_components(self.iter().chain(other.iter()).cloned())
    }

    #[must_use]
    pub fn append_segment(&self, segment: u64) -> Self {
        self.append(Component::from_segment(segment))
    }

    /// Keep the first `n` components. `n` larger than the name is clamped.
    #[must_use]
    pub fn prefix(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self::from_components(self.components[..n].iter().cloned())
    }

    /// Drop the last component. The empty name is its own parent.
    #[must_use]
    pub fn parent(&self) -> Self { self.prefix(self.len().saturating_sub(1)) }

    pub fn get(&self, index: usize) -> Option<&Component> { self.components.get(index) }

    pub fn last(&self) -> Option<&Component> { self.components.last() }

    /// Segment number carried by the final component, if any.
    pub fn segment(&self) -> Option<u64> { self.last().and_then(|c| c.to_segment().ok()) }

    pub fn len(&self) -> usize { self.components.len() }

    pub fn is_empty(&self) -> bool { self.components.is_empty() }

    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.len() <= other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> { self.components.iter() }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self> { Name::parse(s) }
}

impl<'a> IntoIterator for &'a Name {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("/");
        }
        for component in self.iter() {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Name({self})") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name = Name::parse("/catalog/myUniqueName").unwrap();
        assert_eq!(name.len(), 2);
        assert_eq!(name.to_string(), "/catalog/myUniqueName");
        assert_eq!(Name::parse("ndn:/a/b").unwrap(), Name::parse("/a/b").unwrap());
        assert_eq!(Name::parse("//a///b/").unwrap().len(), 2);
        assert_eq!(Name::parse("").unwrap().to_string(), "/");
    }

    #[test]
    fn test_parse_percent_decoding() {
        let name = Name::parse("/a%2Fb/c%20d").unwrap();
        assert_eq!(name.get(0).unwrap().as_bytes(), b"a/b");
        assert_eq!(name.get(1).unwrap().as_bytes(), b"c d");
        assert_eq!(name.to_string(), "/a%2Fb/c%20d");
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(matches!(Name::parse("catalog/x"), Err(NameError::InvalidUri(_))));
    }

    #[test]
    fn test_append_is_non_destructive() {
        let base = Name::parse("/catalog").unwrap();
        let query = base.append("query");
        assert_eq!(base.len(), 1);
        assert_eq!(query.len(), 2);
        assert!(base.is_prefix_of(&query));
        assert!(!query.is_prefix_of(&base));
    }

    #[test]
    fn test_prefix_and_parent() {
        let name = Name::parse("/a/b/c").unwrap().append_segment(7);
        assert_eq!(name.segment(), Some(7));
        assert_eq!(name.parent(), Name::parse("/a/b/c").unwrap());
        assert_eq!(name.prefix(2), Name::parse("/a/b").unwrap());
        assert_eq!(name.prefix(99), name);
        assert_eq!(Name::new().parent(), Name::new());
    }

    #[test]
    fn test_component_order_is_significant() {
        let ab = Name::parse("/a/b").unwrap();
        let ba = Name::parse("/b/a").unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_extend() {
        let dest = Name::parse("/retrieve").unwrap();
        let prefix = Name::parse("/catalog/ui/1234").unwrap();
        assert_eq!(dest.extend(&prefix).to_string(), "/retrieve/catalog/ui/1234");
    }
}
