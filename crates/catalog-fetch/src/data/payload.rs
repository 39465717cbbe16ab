//! Decoded payload shapes served by the catalog.

use serde::{Deserialize, Serialize};

/// One query result.
///
/// The catalog sends either a bare name string or an object with a
/// `has_metadata` flag; both decode to this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct ResultRecord {
    pub name: String,
    pub has_metadata: bool,
}

impl ResultRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_metadata: false,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self) -> Self {
        self.has_metadata = true;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        has_metadata: bool,
    },
}

impl From<RawRecord> for ResultRecord {
    fn from(raw: RawRecord) -> Self {
        match raw {
            RawRecord::Name(name) => ResultRecord::new(name),
            RawRecord::Detailed { name, has_metadata } => ResultRecord { name, has_metadata },
        }
    }
}

/// One segment of a query result object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBatch {
    /// Records carried by this segment. `None` means the catalog found nothing.
    #[serde(default)]
    pub results: Option<Vec<ResultRecord>>,

    /// Running total of matching records declared by the catalog.
    #[serde(default)]
    pub result_count: Option<u64>,
}

impl ResultBatch {
    pub fn records(&self) -> &[ResultRecord] { self.results.as_deref().unwrap_or(&[]) }

    pub fn is_empty(&self) -> bool { self.records().is_empty() }
}

/// Candidate next components for a partial path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    #[serde(default)]
    pub next: Vec<String>,

    /// The partial path already names a leaf; callers must not add a
    /// trailing separator to the candidates.
    #[serde(default)]
    pub last_component: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u64>,
}

impl Completion {
    /// Fold another segment's candidates into this one.
    ///
    /// Lists are concatenated as-is; the leaf flag follows the newest segment.
    pub fn merge(&mut self, other: Completion) {
        self.next.extend(other.next);
        self.last_component = other.last_component;
        if other.result_count.is_some() {
            self.result_count = other.result_count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_string_or_object() {
        let records: Vec<ResultRecord> = serde_json::from_str(
            r#"["/ndn/test1", {"name": "/ndn/test2", "has_metadata": true}, {"name": "/ndn/test3"}]"#,
        )
        .unwrap();
        assert_eq!(records[0], ResultRecord::new("/ndn/test1"));
        assert_eq!(records[1], ResultRecord::new("/ndn/test2").with_metadata());
        assert_eq!(records[2], ResultRecord::new("/ndn/test3"));
    }

    #[test]
    fn test_batch_field_names() {
        let batch: ResultBatch = serde_json::from_str(
            r#"{"resultCount": 3, "results": ["/a", "/b"], "viewStart": 0, "viewEnd": 1}"#,
        )
        .unwrap();
        assert_eq!(batch.result_count, Some(3));
        assert_eq!(batch.records().len(), 2);
    }

    #[test]
    fn test_batch_without_results() {
        let batch: ResultBatch = serde_json::from_str(r#"{"resultCount": 0}"#).unwrap();
        assert!(batch.results.is_none());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_completion_merge_keeps_duplicates() {
        let mut acc: Completion = serde_json::from_str(r#"{"next": ["a", "b"]}"#).unwrap();
        acc.merge(serde_json::from_str(r#"{"next": ["b"], "lastComponent": true}"#).unwrap());
        assert_eq!(acc.next, vec!["a", "b", "b"]);
        assert!(acc.last_component);
    }
}
