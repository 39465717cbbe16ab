use catalog_name::{Component, Name};

use crate::data::QuerySpec;

/// Marker component placed between the catalog prefix and the query.
pub const QUERY_COMPONENT: &str = "query";

/// Components kept after the catalog prefix when anchoring paging:
/// the query marker, the serialized spec and the result version.
pub const QUERY_NAME_DEPTH: usize = 3;

/// `catalog_prefix / "query" / serialize(spec)`.
pub fn build_query_name(catalog_prefix: &Name, spec: &QuerySpec) -> Name {
    catalog_prefix
        .append(QUERY_COMPONENT)
        .append(Component::from(spec.to_json()))
}

/// Truncate a query response name to the stable anchor used for paging.
///
/// The catalog answers with extra components (version, segment) after the
/// query; only the first [`QUERY_NAME_DEPTH`] past the prefix are kept.
pub fn canonical_query_name(catalog_prefix: &Name, response_name: &Name) -> Name {
    response_name.prefix(catalog_prefix.len() + QUERY_NAME_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_name() {
        let prefix = Name::parse("/catalog/myUniqueName").unwrap();
        let spec = QuerySpec::new().with("category", "temperature");
        let name = build_query_name(&prefix, &spec);
        assert_eq!(name.len(), 4);
        assert_eq!(name.get(2).unwrap().as_bytes(), b"query");
        assert_eq!(name.get(3).unwrap().as_bytes(), br#"{"category":"temperature"}"#);
    }

    #[test]
    fn test_build_is_deterministic() {
        let prefix = Name::parse("/catalog").unwrap();
        let spec = QuerySpec::new()
            .with("category", "temperature")
            .with("region", "pacific");
        assert_eq!(build_query_name(&prefix, &spec), build_query_name(&prefix, &spec.clone()));
    }

    #[test]
    fn test_canonical_name_truncates_extra_components() {
        let prefix = Name::parse("/catalog").unwrap();
        let query = build_query_name(&prefix, &QuerySpec::path("/a"));
        let response_name = query.append("v1").append_segment(0);
        let canonical = canonical_query_name(&prefix, &response_name);
        assert_eq!(canonical, query.append("v1"));
        assert_eq!(canonical.len(), prefix.len() + QUERY_NAME_DEPTH);
    }
}
