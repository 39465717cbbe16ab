//! Retrieval requests handed to a retrieve agent.
//!
//! The client publishes the request payload under a fresh prefix and tells
//! the chosen destination where to find it by expressing
//! `<destination>/<prefix>`. Signing and serving the payload belong to the
//! transport's owner.

use std::collections::BTreeMap;

use catalog_name::Name;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::config::{KeyPair, RetrievalConfig};
use crate::data::Response;
use crate::effects::requester::Requester;
use crate::effects::transport::Transport;
use crate::error::{Error, Result};

/// Root of the prefixes retrieval payloads are published under.
pub const RETRIEVE_PREFIX: &str = "/catalog/ui";

/// Dimension bounds for one variable of a subset request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubsetVariable {
    pub variable: String,
    pub values: BTreeMap<String, String>,
}

impl SubsetVariable {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalRequest {
    /// Whole objects by name.
    Names(Vec<String>),

    /// One subset product of a single file.
    Subset {
        name: String,
        variables: Vec<SubsetVariable>,
    },
}

impl RetrievalRequest {
    /// JSON body served to the retrieve agent.
    pub fn payload(&self) -> String {
        match self {
            RetrievalRequest::Names(names) => json!(names).to_string(),
            RetrievalRequest::Subset { name, variables } => {
                json!({ "name": name, "subset": variables }).to_string()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RetrievalRequest::Names(names) => names.is_empty(),
            RetrievalRequest::Subset { name, .. } => name.is_empty(),
        }
    }
}

/// A validated retrieval, ready to announce.
#[derive(Debug, Clone)]
pub struct RetrievalPlan {
    destination: Name,
    prefix: Name,
    request: RetrievalRequest,
    key: KeyPair,
}

impl RetrievalPlan {
    /// Check configuration and mint a unique publication prefix.
    ///
    /// Fails with [`Error::ConfigurationMissing`] before anything is sent
    /// when the key pair or the destination is not configured.
    pub fn new(
        config: &RetrievalConfig,
        destination: &str,
        request: RetrievalRequest,
    ) -> Result<Self> {
        let key = config.require_key()?;
        let destination = config.require_destination(destination)?;
        if request.is_empty() {
            return Err(Error::InvalidState("nothing to retrieve".to_string()));
        }
        let prefix = Name::parse(RETRIEVE_PREFIX)?.append(Uuid::new_v4().to_string());

        Ok(Self {
            destination,
            prefix,
            request,
            key,
        })
    }

    /// Prefix the payload is published under.
    pub fn prefix(&self) -> &Name { &self.prefix }

    pub fn destination(&self) -> &Name { &self.destination }

    pub fn request(&self) -> &RetrievalRequest { &self.request }

    pub fn key(&self) -> &KeyPair { &self.key }

    pub fn payload(&self) -> String { self.request.payload() }

    /// `<destination>/<prefix>`.
    pub fn notification_name(&self) -> Name { self.destination.extend(&self.prefix) }

    /// Express the notification to the destination.
    pub async fn notify<T: Transport>(&self, requester: &Requester<T>) -> Result<Response> {
        let name = self.notification_name();
        info!(%name, "notifying retrieve agent");
        requester.send(&name).await
    }
}
