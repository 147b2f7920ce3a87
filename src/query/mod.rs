//! Query execution: search options, the engine that evaluates them, and
//! paginated results.

pub mod engine;
pub mod results;
pub mod spec;

// Re-export commonly used types
pub use engine::{QueryEngine, ScoredDocument};
pub use results::{SearchResult, SearchResults};
pub use spec::{Order, RankingStrategy, SearchSpec, TermMatch};
