//! Single name component and segment number encoding.

use std::fmt;

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

use crate::error::{NameError, Result};

/// Marker byte prefixed to segment number components.
pub const SEGMENT_MARKER: u8 = 0x00;

/// Bytes left as-is in the URI form; everything else is percent-encoded.
pub(crate) const COMPONENT_ESCAPE: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// An opaque binary name component.
///
/// Equality is byte-wise. Cloning is cheap since the value is reference
/// counted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Component(Bytes);

impl Component {
    pub fn new(value: impl Into<Bytes>) -> Self { Self(value.into()) }

    /// Encode a segment number: marker byte followed by the value in the
    /// smallest of 1, 2, 4 or 8 big-endian bytes.
    pub fn from_segment(segment: u64) -> Self {
        let mut out = Vec::with_capacity(9);
        out.push(SEGMENT_MARKER);
        if segment <= u8::MAX as u64 {
            out.push(segment as u8);
        } else if segment <= u16::MAX as u64 {
            out.extend_from_slice(&(segment as u16).to_be_bytes());
        } else if segment <= u32::MAX as u64 {
            out.extend_from_slice(&(segment as u32).to_be_bytes());
        } else {
            out.extend_from_slice(&segment.to_be_bytes());
        }
        Self(Bytes::from(out))
    }

    /// Decode a segment number written by [`Component::from_segment`].
    pub fn to_segment(&self) -> Result<u64> {
        let (marker, value) = self
            .0
            .split_first()
            .ok_or_else(|| NameError::NotASegment(self.to_string()))?;
        if *marker != SEGMENT_MARKER || !matches!(value.len(), 1 | 2 | 4 | 8) {
            return Err(NameError::NotASegment(self.to_string()));
        }
        Ok(value.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    pub fn is_segment(&self) -> bool { self.to_segment().is_ok() }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<&str> for Component {
    fn from(value: &str) -> Self { Self(Bytes::copy_from_slice(value.as_bytes())) }
}

impl From<String> for Component {
    fn from(value: String) -> Self { Self(Bytes::from(value)) }
}

impl From<Vec<u8>> for Component {
    fn from(value: Vec<u8>) -> Self { Self(Bytes::from(value)) }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", percent_encode(&self.0, COMPONENT_ESCAPE))
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({self})")
    }
}
