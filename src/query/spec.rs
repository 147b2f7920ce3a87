//! Search specification: filters, ranking and page size.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{LocalSearchError, Result};

/// Page size used when neither the spec nor the session sets one.
pub const DEFAULT_RESULT_COUNT_PER_PAGE: usize = 10;

/// How query terms are matched against indexed terms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermMatch {
    /// A query term matches any prefix-indexed term it is a prefix of.
    #[default]
    Prefix,
    /// A query term matches only an indexed term equal to it.
    ExactOnly,
}

/// The signal results are ranked by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingStrategy {
    #[default]
    DocumentScore,
    CreationTimestamp,
    /// No ranking; results come back in `(namespace, id)` order.
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    #[default]
    Descending,
    Ascending,
}

/// Options for a search.
///
/// ```
/// use localsearch::query::{RankingStrategy, SearchSpec};
///
/// let spec = SearchSpec::new()
///     .add_namespace("user1")
///     .ranking(RankingStrategy::CreationTimestamp)
///     .result_count_per_page(5);
/// assert!(spec.matches_namespace("user1"));
/// assert!(!spec.matches_namespace("user2"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSpec {
    /// Namespaces to include; empty includes all.
    pub namespaces: BTreeSet<String>,
    /// Schema types to include; empty includes all.
    pub schema_types: BTreeSet<String>,
    pub term_match: TermMatch,
    pub ranking: RankingStrategy,
    pub order: Order,
    /// Results per page; `None` defers to the session default.
    pub result_count_per_page: Option<usize>,
}

impl SearchSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict results to a namespace. May be called repeatedly.
    pub fn add_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespaces.insert(namespace.into());
        self
    }

    /// Restrict results to a schema type. May be called repeatedly.
    pub fn add_schema_type<S: Into<String>>(mut self, schema_type: S) -> Self {
        self.schema_types.insert(schema_type.into());
        self
    }

    pub fn term_match(mut self, term_match: TermMatch) -> Self {
        self.term_match = term_match;
        self
    }

    pub fn ranking(mut self, ranking: RankingStrategy) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn result_count_per_page(mut self, count: usize) -> Self {
        self.result_count_per_page = Some(count);
        self
    }

    /// Page size, falling back to `default` when unset.
    pub fn page_size_or(&self, default: usize) -> usize {
        self.result_count_per_page.unwrap_or(default)
    }

    pub fn matches_namespace(&self, namespace: &str) -> bool {
        self.namespaces.is_empty() || self.namespaces.contains(namespace)
    }

    pub fn matches_schema_type(&self, schema_type: &str) -> bool {
        self.schema_types.is_empty() || self.schema_types.contains(schema_type)
    }

    /// Whether a document passes the namespace and schema filters.
    pub fn accepts(&self, document: &Document) -> bool {
        self.matches_namespace(document.namespace())
            && self.matches_schema_type(document.schema_type())
    }

    pub fn validate(&self) -> Result<()> {
        if self.result_count_per_page == Some(0) {
            return Err(LocalSearchError::invalid_argument(
                "result_count_per_page must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = SearchSpec::new();
        assert!(spec.namespaces.is_empty());
        assert_eq!(spec.term_match, TermMatch::Prefix);
        assert_eq!(spec.ranking, RankingStrategy::DocumentScore);
        assert_eq!(spec.order, Order::Descending);
        assert_eq!(
            spec.page_size_or(DEFAULT_RESULT_COUNT_PER_PAGE),
            DEFAULT_RESULT_COUNT_PER_PAGE
        );
        assert!(spec.matches_namespace("anything"));
    }

    #[test]
    fn test_filters() {
        let spec = SearchSpec::new()
            .add_namespace("user1")
            .add_schema_type("Note");
        let note = Document::builder("user1", "a", "Note").build();
        let other_ns = Document::builder("user2", "a", "Note").build();
        let other_type = Document::builder("user1", "a", "Task").build();

        assert!(spec.accepts(&note));
        assert!(!spec.accepts(&other_ns));
        assert!(!spec.accepts(&other_type));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let spec = SearchSpec::new().result_count_per_page(0);
        assert!(matches!(
            spec.validate(),
            Err(LocalSearchError::InvalidArgument(_))
        ));
        assert!(SearchSpec::new().result_count_per_page(1).validate().is_ok());
    }
}
