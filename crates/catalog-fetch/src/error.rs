//! Error types for catalog-fetch.

use catalog_name::{Name, NameError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A single exchange used up its whole retry budget.
    #[error("request timed out after {attempts} attempts: {name}")]
    Timeout { name: Name, attempts: u32 },

    /// A segment of a multi-segment object could not be retrieved.
    #[error("segment retrieval timed out: {name}")]
    SegmentTimeout { name: Name },

    #[error("malformed response for {name}: {reason}")]
    MalformedResponse { name: Name, reason: String },

    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("page {page} is beyond the available results ({available} records)")]
    PageOutOfRange { page: usize, available: usize },

    #[error("no query has been issued in this session")]
    NoActiveQuery,

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Name(#[from] NameError),
}

impl Error {
    /// Name of the exchange that failed, when the error is tied to one.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Error::Timeout { name, .. }
            | Error::SegmentTimeout { name }
            | Error::MalformedResponse { name, .. } => Some(name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
