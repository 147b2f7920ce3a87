//! # localsearch
//!
//! An embedded, schema-typed document store with an inverted index and
//! prefix search.
//!
//! ## Features
//!
//! - Typed schemas validated on every write
//! - Unicode-aware tokenization, including scripts without word spacing
//! - Prefix and exact term matching with namespace and schema filters
//! - Score or timestamp ranking with paginated results
//! - Write-ahead log and snapshots for crash recovery
//! - Async session API on tokio

pub mod analysis;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod schema;
pub mod session;
pub mod storage;
pub mod store;

pub mod prelude {
    pub use crate::document::{Document, DocumentKey, FieldValue};
    pub use crate::error::{LocalSearchError, Result};
    pub use crate::query::{Order, RankingStrategy, SearchResult, SearchSpec, TermMatch};
    pub use crate::schema::{Cardinality, FieldDefinition, IndexingMode, PropertyType, Schema};
    pub use crate::session::{SearchSession, SessionConfig};
    pub use crate::store::DeleteOutcome;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
