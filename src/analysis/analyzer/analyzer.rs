//! Core analyzer trait definition.
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Token Stream
//! ```
//!
//! # Examples
//!
//! ```
//! use localsearch::analysis::analyzer::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new();
//! let tokens: Vec<_> = analyzer.analyze("Buy FRESH fruit!").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "buy");
//! assert_eq!(tokens[1].text, "fresh");
//! assert_eq!(tokens[2].text, "fruit");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Analyzers must be deterministic: the index and the query engine rely on
/// identical input producing identical tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a lazy stream of tokens.
    ///
    /// Stopped tokens never appear in the returned stream.
    fn analyze<'a>(&self, text: &'a str) -> Result<TokenStream<'a>>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
