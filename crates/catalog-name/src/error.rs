#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("component is not a segment number: {0}")]
    NotASegment(String),

    #[error("invalid name URI: {0}")]
    InvalidUri(String),
}

pub type Result<T> = std::result::Result<T, NameError>;
