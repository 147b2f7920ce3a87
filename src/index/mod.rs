//! Inverted index mapping normalized terms to document postings.

pub mod inverted;
pub mod posting;

// Re-export commonly used types
pub use inverted::{InvertedIndex, PreparedDocument, QueryTerm};
pub use posting::Posting;
