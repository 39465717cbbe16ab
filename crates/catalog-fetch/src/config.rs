//! Deployment configuration.
//!
//! Mirrors the `config.json` a catalog deployment serves next to the client:
//!
//! ```json
//! {
//!   "global": { "catalogPrefix": "/catalog/myUniqueName", "faceConfig": { "host": "localhost" } },
//!   "retrieval": {
//!     "destinations": ["/retrieve/ucar"],
//!     "demoKey": { "pub": "...", "priv": "..." }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use catalog_name::Name;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    pub global: GlobalConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    pub catalog_prefix: String,

    /// Transport connection settings, passed through untouched.
    #[serde(default)]
    pub face_config: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    #[serde(default)]
    pub destinations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_key: Option<DemoKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_download_base: Option<String>,
}

/// Base64 key pair used to sign retrieval commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoKey {
    #[serde(rename = "pub", default)]
    pub pub_key: String,

    #[serde(rename = "priv", default)]
    pub priv_key: String,
}

/// Decoded key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public: Vec<u8>,
    pub private: Vec<u8>,
}

impl CatalogConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::from_json(&contents)?;
        info!(path = %path.display(), prefix = %config.global.catalog_prefix, "config loaded");
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    pub fn catalog_prefix(&self) -> Result<Name> { Ok(Name::parse(&self.global.catalog_prefix)?) }

    /// Deep-merge a JSON overlay into this config.
    ///
    /// Objects merge key by key; any other value replaces what was there.
    /// On any failure the overlay is skipped with a warning and `false` is
    /// returned.
    pub fn apply_overlay(&mut self, overlay: &str) -> bool {
        match self.merged(overlay) {
            Ok(merged) => {
                *self = merged;
                true
            }
            Err(e) => {
                warn!("failure in config overlay, skipping: {e}");
                false
            }
        }
    }

    fn merged(&self, overlay: &str) -> Result<Self> {
        let overlay: Value = serde_json::from_str(overlay)
            .map_err(|e| Error::Config(format!("invalid overlay: {e}")))?;
        let mut base = serde_json::to_value(self).map_err(|e| Error::Config(e.to_string()))?;
        deep_merge(&mut base, overlay);
        serde_json::from_value(base).map_err(|e| Error::Config(format!("overlay breaks config: {e}")))
    }
}

fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                deep_merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

impl RetrievalConfig {
    /// Key material needed before any retrieval can be signed.
    pub fn require_key(&self) -> Result<KeyPair> {
        let missing = || {
            Error::ConfigurationMissing(
                "this host was not configured to handle retrieval (retrieval.demoKey)".to_string(),
            )
        };
        let key = self.demo_key.as_ref().ok_or_else(missing)?;
        if key.pub_key.is_empty() || key.priv_key.is_empty() {
            return Err(missing());
        }

        let decode = |field: &str, value: &str| {
            STANDARD.decode(value).map_err(|e| {
                Error::ConfigurationMissing(format!("retrieval.demoKey.{field} is not base64: {e}"))
            })
        };
        Ok(KeyPair {
            public: decode("pub", &key.pub_key)?,
            private: decode("priv", &key.priv_key)?,
        })
    }

    /// `destination` parsed as a name, provided the deployment offers it.
    pub fn require_destination(&self, destination: &str) -> Result<Name> {
        if !self.destinations.iter().any(|d| d == destination) {
            return Err(Error::ConfigurationMissing(format!(
                "unknown retrieval destination: {destination}"
            )));
        }
        Ok(Name::parse(destination)?)
    }
}

/// Optional mapping from catalog names to directly downloadable files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversions {
    entries: HashMap<String, String>,
}

impl Conversions {
    /// Load `conversions.json`. A missing or invalid file yields an empty
    /// mapping.
    pub fn load(path: &Path) -> Self {
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|contents| Self::from_json(&contents).map_err(|e| e.to_string()));
        match parsed {
            Ok(conversions) => conversions,
            Err(e) => {
                warn!(path = %path.display(), "failed to get conversions: {e}");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("failed to parse conversions: {e}")))?;
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&str> { self.entries.get(name).map(String::as_str) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Download link for `name` under the configured `directDownloadBase`.
    /// `None` when no base is configured or the name has no converted file.
    pub fn direct_download_url(&self, retrieval: &RetrievalConfig, name: &str) -> Option<String> {
        let base = retrieval.direct_download_base.as_deref()?;
        let file = self.get(name)?;
        Some(format!("{}/{}", base.trim_end_matches('/'), file.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const CONFIG: &str = r#"{
        "global": { "catalogPrefix": "/catalog/myUniqueName", "faceConfig": { "host": "localhost", "port": 9696 } },
        "retrieval": {
            "destinations": ["/retrieve/ucar", "/retrieve/csu"],
            "demoKey": { "pub": "AQID", "priv": "BAUG" },
            "directDownloadBase": "http://example.org/ucar/"
        }
    }"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = write_temp(CONFIG);
        let config = CatalogConfig::load(file.path()).unwrap();

        assert_eq!(config.catalog_prefix().unwrap().to_string(), "/catalog/myUniqueName");
        assert_eq!(config.global.face_config["port"], 9696);
        assert_eq!(config.retrieval.destinations.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogConfig::load(&dir.path().join("config.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overlay_deep_merges() {
        let mut config = CatalogConfig::from_json(CONFIG).unwrap();

        assert!(config.apply_overlay(r#"{"global": {"faceConfig": {"port": 6363}}}"#));

        assert_eq!(config.global.face_config["port"], 6363);
        assert_eq!(config.global.face_config["host"], "localhost");
        assert_eq!(config.global.catalog_prefix, "/catalog/myUniqueName");
    }

    #[test]
    fn test_bad_overlay_is_skipped() {
        let mut config = CatalogConfig::from_json(CONFIG).unwrap();
        let before = config.clone();

        assert!(!config.apply_overlay("{not json"));
        assert!(!config.apply_overlay(r#"{"retrieval": {"destinations": 5}}"#));

        assert_eq!(config, before);
    }

    #[test]
    fn test_require_key() {
        let config = CatalogConfig::from_json(CONFIG).unwrap();
        let key = config.retrieval.require_key().unwrap();
        assert_eq!(key.public, vec![1, 2, 3]);
        assert_eq!(key.private, vec![4, 5, 6]);

        let mut without = config.retrieval.clone();
        without.demo_key = None;
        assert!(matches!(without.require_key(), Err(Error::ConfigurationMissing(_))));

        without.demo_key = Some(DemoKey {
            pub_key: "AQID".to_string(),
            priv_key: String::new(),
        });
        assert!(matches!(without.require_key(), Err(Error::ConfigurationMissing(_))));
    }

    #[test]
    fn test_require_destination() {
        let config = CatalogConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.retrieval.require_destination("/retrieve/csu").unwrap().len(), 2);
        assert!(matches!(
            config.retrieval.require_destination("/retrieve/elsewhere"),
            Err(Error::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn test_conversions() {
        let file = write_temp(r#"{"/cmip5/tas/r1": "tas_r1.nc"}"#);
        let conversions = Conversions::load(file.path());
        let retrieval = CatalogConfig::from_json(CONFIG).unwrap().retrieval;

        assert_eq!(
            conversions.direct_download_url(&retrieval, "/cmip5/tas/r1").as_deref(),
            Some("http://example.org/ucar/tas_r1.nc")
        );
        assert_eq!(conversions.direct_download_url(&retrieval, "/other"), None);
    }

    #[test]
    fn test_direct_download_needs_a_base() {
        let conversions = Conversions::from_json(r#"{"/cmip5/tas/r1": "tas_r1.nc"}"#).unwrap();
        let retrieval = RetrievalConfig::default();
        assert_eq!(conversions.direct_download_url(&retrieval, "/cmip5/tas/r1"), None);
    }

    #[test]
    fn test_missing_conversions_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Conversions::load(&dir.path().join("conversions.json")).is_empty());
    }
}
