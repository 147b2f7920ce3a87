//! Schema definitions and the schema registry.
//!
//! Schemas are declared explicitly at startup and registered with a
//! [`SchemaRegistry`], which validates every document before it is stored.

pub mod field;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod schema;

// Re-export commonly used types
pub use field::{Cardinality, FieldDefinition, IndexingMode, PropertyType};
pub use registry::{SchemaChange, SchemaRegistry};
pub use schema::{Schema, SchemaBuilder};
