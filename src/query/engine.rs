//! Query execution over the document store and inverted index.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::document::{Document, DocumentKey};
use crate::error::Result;
use crate::index::{InvertedIndex, Posting, QueryTerm};
use crate::query::spec::{Order, RankingStrategy, SearchSpec, TermMatch};
use crate::store::DocumentStore;

/// A matched document before it is handed to the caller.
#[derive(Clone, Debug)]
pub struct ScoredDocument {
    pub document: Arc<Document>,
    /// Names of the fields that matched at least one query term, sorted.
    pub matched_fields: Vec<String>,
    /// The value results were ranked by.
    pub ranking_signal: i64,
}

/// Runs searches against one consistent view of store and index.
#[derive(Debug)]
pub struct QueryEngine<'a> {
    store: &'a DocumentStore,
    index: &'a InvertedIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a DocumentStore, index: &'a InvertedIndex) -> Self {
        QueryEngine { store, index }
    }

    /// Find and rank every document matching `query`.
    ///
    /// The query is analyzed exactly like indexed text, and words that
    /// parse as integers also match integer fields holding that value. A
    /// document matches when every query term matches at least one of its
    /// indexed terms. A
    /// query without terms matches every document that passes the filters.
    pub fn execute(&self, query: &str, spec: &SearchSpec) -> Result<Vec<ScoredDocument>> {
        spec.validate()?;
        let terms = self.index.analyze_query(query)?;

        let mut results: Vec<ScoredDocument> = if terms.is_empty() {
            self.store
                .iter()
                .filter(|doc| spec.accepts(doc))
                .map(|doc| Self::scored(doc, Vec::new(), spec))
                .collect()
        } else {
            self.intersect(&terms, spec)
                .into_iter()
                .filter_map(|(key, fields)| {
                    let doc = self.store.get(&key)?;
                    spec.accepts(&doc)
                        .then(|| Self::scored(&doc, fields.into_iter().collect(), spec))
                })
                .collect()
        };

        results.sort_by(|a, b| Self::compare(a, b, spec));
        Ok(results)
    }

    /// Documents matched by every term, with the fields that matched.
    fn intersect(
        &self,
        terms: &[QueryTerm],
        spec: &SearchSpec,
    ) -> BTreeMap<DocumentKey, BTreeSet<String>> {
        let mut matches: Option<BTreeMap<DocumentKey, BTreeSet<String>>> = None;

        for term in terms {
            let exact_only = spec.term_match == TermMatch::ExactOnly;
            let postings = self.index.lookup_query_term(term, exact_only);
            let term_matches = Self::group(postings, spec);

            let next = match matches.take() {
                None => term_matches,
                Some(mut acc) => {
                    acc.retain(|key, _| term_matches.contains_key(key));
                    for (key, fields) in term_matches {
                        if let Some(existing) = acc.get_mut(&key) {
                            existing.extend(fields);
                        }
                    }
                    acc
                }
            };
            if next.is_empty() {
                return next;
            }
            matches = Some(next);
        }

        matches.unwrap_or_default()
    }

    fn group(
        postings: BTreeSet<&Posting>,
        spec: &SearchSpec,
    ) -> BTreeMap<DocumentKey, BTreeSet<String>> {
        let mut grouped: BTreeMap<DocumentKey, BTreeSet<String>> = BTreeMap::new();
        for posting in postings {
            if spec.matches_namespace(&posting.key.namespace) {
                grouped
                    .entry(posting.key.clone())
                    .or_default()
                    .insert(posting.field.clone());
            }
        }
        grouped
    }

    fn scored(
        document: &Arc<Document>,
        matched_fields: Vec<String>,
        spec: &SearchSpec,
    ) -> ScoredDocument {
        let ranking_signal = match spec.ranking {
            RankingStrategy::DocumentScore => i64::from(document.score()),
            RankingStrategy::CreationTimestamp => document.creation_timestamp_millis(),
            RankingStrategy::None => 0,
        };

        ScoredDocument {
            document: Arc::clone(document),
            matched_fields,
            ranking_signal,
        }
    }

    /// Ranking signal in the requested order, then key ascending.
    fn compare(a: &ScoredDocument, b: &ScoredDocument, spec: &SearchSpec) -> Ordering {
        let by_signal = match spec.order {
            Order::Descending => b.ranking_signal.cmp(&a.ranking_signal),
            Order::Ascending => a.ranking_signal.cmp(&b.ranking_signal),
        };
        by_signal.then_with(|| a.document.key().cmp(b.document.key()))
    }
}
