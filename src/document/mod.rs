//! Documents stored and indexed by a search session.
//!
//! A [`Document`] is addressed by its [`DocumentKey`] (namespace + id),
//! names the schema it conforms to, carries a ranking score and a sorted map
//! of typed [`FieldValue`]s.

#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;

// Re-export commonly used types
pub use document::{Document, DocumentBuilder, DocumentKey};
pub use field_value::FieldValue;
