//! Hierarchical names made of opaque binary components.
//!
//! A [`Name`] addresses both queries and data segments. Components are kept
//! in order and never reordered; a trailing [`Component`] may carry a segment
//! number using the segment marker convention.
//!
//! # Example
//!
//! ```
//! use catalog_name::Name;
//!
//! let base = Name::parse("/catalog/query").unwrap();
//! let seg = base.append_segment(3);
//! assert_eq!(seg.len(), 3);
//! assert_eq!(seg.last().unwrap().to_segment().unwrap(), 3);
//! assert_eq!(seg.prefix(2), base);
//! ```

pub use self::component::Component;
pub use self::error::{NameError, Result};
pub use self::name::Name;

mod component;
mod error;
mod name;
