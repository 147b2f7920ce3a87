//! Text analysis for indexing and querying.
//!
//! Raw field text flows through an [`Analyzer`]: a Unicode word tokenizer
//! followed by normalizing token filters. The same analyzer is applied to
//! documents at index time and to query text at search time, so both sides
//! agree on what a token is.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
