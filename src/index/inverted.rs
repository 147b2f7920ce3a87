//! In-memory inverted index with prefix lookup.
//!
//! Text terms live in two sorted dictionaries, one per indexing mode. A
//! prefix lookup is a range scan over the prefix dictionary starting at the
//! query term; exact-indexed fields only answer to the whole term. Integer
//! fields bypass the analyzer and are keyed by their value, sign included.
//! A forward list per document records every `(term, field)` pair it
//! contributed, so a retraction removes exactly those postings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;
use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::document::{Document, DocumentKey, FieldValue};
use crate::error::Result;
use crate::index::posting::Posting;
use crate::schema::{IndexingMode, Schema};

type TermDictionary = BTreeMap<String, BTreeSet<Posting>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dictionary {
    Prefix,
    Exact,
    Integer,
}

/// A term a document contributed, kept for exact retraction.
#[derive(Clone, Debug, PartialEq, Eq)]
struct IndexedTerm {
    term: String,
    field: String,
    dictionary: Dictionary,
}

/// One unit of a query that every matching document must satisfy.
///
/// A whitespace-separated word that parses as an integer also matches
/// integer fields holding that value; any other word contributes one
/// query term per analyzed token.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTerm {
    /// Analyzed text terms; matching any of them is enough.
    pub text: Vec<String>,
    pub integer: Option<i64>,
}

/// The analyzed terms of one document, ready to be applied to an index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedDocument {
    key: DocumentKey,
    terms: Vec<IndexedTerm>,
}

impl PreparedDocument {
    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// Number of postings the document will contribute.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Token → postings map supporting incremental updates.
pub struct InvertedIndex {
    analyzer: Arc<dyn Analyzer>,
    prefix_terms: TermDictionary,
    exact_terms: TermDictionary,
    integer_terms: TermDictionary,
    forward: AHashMap<DocumentKey, Vec<IndexedTerm>>,
}

impl InvertedIndex {
    /// Create an index using the standard analyzer.
    pub fn new() -> Self {
        Self::with_analyzer(Arc::new(StandardAnalyzer::new()))
    }

    /// Create an index using a custom analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        InvertedIndex {
            analyzer,
            prefix_terms: TermDictionary::new(),
            exact_terms: TermDictionary::new(),
            integer_terms: TermDictionary::new(),
            forward: AHashMap::new(),
        }
    }

    /// The analyzer shared by indexing and querying.
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Analyze `text` into its distinct terms, in first-seen order.
    pub fn analyze_terms(&self, text: &str) -> Result<Vec<String>> {
        let mut seen = BTreeSet::new();
        Ok(self
            .analyzer
            .analyze(text)?
            .map(|token| token.text)
            .filter(|term| seen.insert(term.clone()))
            .collect())
    }

    /// Split a query into the terms a document must all match.
    pub fn analyze_query(&self, query: &str) -> Result<Vec<QueryTerm>> {
        let mut seen = BTreeSet::new();
        let mut terms = Vec::new();
        for word in query.split_whitespace() {
            let analyzed = self.analyze_terms(word)?;
            let word_terms = match word.parse::<i64>() {
                Ok(value) => vec![QueryTerm {
                    text: analyzed,
                    integer: Some(value),
                }],
                Err(_) => analyzed
                    .into_iter()
                    .map(|text| QueryTerm {
                        text: vec![text],
                        integer: None,
                    })
                    .collect(),
            };
            terms.extend(
                word_terms
                    .into_iter()
                    .filter(|term| seen.insert(term.clone())),
            );
        }
        Ok(terms)
    }

    /// Analyze every indexed field of `document` without touching the
    /// index.
    pub fn prepare(&self, document: &Document, schema: &Schema) -> Result<PreparedDocument> {
        let mut terms = Vec::new();
        for field in schema.indexed_fields() {
            let field_name = field.name().to_string();
            match document.get_field(field.name()) {
                None => {}
                Some(FieldValue::Integer(value)) => terms.push(IndexedTerm {
                    term: value.to_string(),
                    field: field_name,
                    dictionary: Dictionary::Integer,
                }),
                Some(FieldValue::Text(text)) => {
                    let dictionary = match field.indexing_mode() {
                        IndexingMode::Prefix => Dictionary::Prefix,
                        IndexingMode::Exact | IndexingMode::None => Dictionary::Exact,
                    };
                    for term in self.analyze_terms(text)? {
                        terms.push(IndexedTerm {
                            term,
                            field: field_name.clone(),
                            dictionary,
                        });
                    }
                }
            }
        }

        Ok(PreparedDocument {
            key: document.key().clone(),
            terms,
        })
    }

    /// Install prepared postings, replacing whatever the document
    /// contributed before. Returns the number of postings inserted.
    pub fn apply(&mut self, prepared: PreparedDocument) -> usize {
        let PreparedDocument { key, terms } = prepared;
        self.retract(&key);

        let count = terms.len();
        for indexed in &terms {
            self.dictionary_mut(indexed.dictionary)
                .entry(indexed.term.clone())
                .or_default()
                .insert(Posting::new(key.clone(), indexed.field.clone()));
        }
        if !terms.is_empty() {
            self.forward.insert(key, terms);
        }

        count
    }

    /// Index every indexed field of `document`, replacing whatever the
    /// document contributed before.
    ///
    /// An analysis failure leaves the index unchanged. Returns the number
    /// of postings inserted.
    pub fn index(&mut self, document: &Document, schema: &Schema) -> Result<usize> {
        let prepared = self.prepare(document, schema)?;
        Ok(self.apply(prepared))
    }

    /// Remove every posting previously inserted for `key`.
    ///
    /// Returns the number of postings removed; zero when the document was
    /// never indexed.
    pub fn retract(&mut self, key: &DocumentKey) -> usize {
        let Some(terms) = self.forward.remove(key) else {
            return 0;
        };

        let count = terms.len();
        for indexed in terms {
            let dictionary = self.dictionary_mut(indexed.dictionary);
            if let Some(postings) = dictionary.get_mut(&indexed.term) {
                postings.remove(&Posting::new(key.clone(), indexed.field));
                if postings.is_empty() {
                    dictionary.remove(&indexed.term);
                }
            }
        }

        count
    }

    /// Postings matching `term` as a prefix in prefix-indexed text fields,
    /// or as a whole term in exact-indexed text fields.
    ///
    /// `term` must already be normalized by the index analyzer. An empty
    /// term matches nothing.
    pub fn lookup(&self, term: &str) -> BTreeSet<&Posting> {
        if term.is_empty() {
            return BTreeSet::new();
        }

        let mut postings: BTreeSet<&Posting> = self
            .prefix_terms
            .range::<str, _>((Bound::Included(term), Bound::Unbounded))
            .take_while(|(candidate, _)| candidate.starts_with(term))
            .flat_map(|(_, postings)| postings.iter())
            .collect();
        if let Some(exact) = self.exact_terms.get(term) {
            postings.extend(exact.iter());
        }
        postings
    }

    /// Postings whose text term equals `term` exactly, whatever the field's
    /// indexing mode.
    pub fn lookup_exact(&self, term: &str) -> BTreeSet<&Posting> {
        self.prefix_terms
            .get(term)
            .into_iter()
            .chain(self.exact_terms.get(term))
            .flatten()
            .collect()
    }

    /// Postings of integer fields holding `value`.
    pub fn lookup_integer(&self, value: i64) -> BTreeSet<&Posting> {
        self.integer_terms
            .get(&value.to_string())
            .into_iter()
            .flatten()
            .collect()
    }

    /// Postings matching any alternative of a query term.
    pub fn lookup_query_term(&self, term: &QueryTerm, exact_only: bool) -> BTreeSet<&Posting> {
        let mut postings: BTreeSet<&Posting> = term
            .text
            .iter()
            .flat_map(|text| {
                if exact_only {
                    self.lookup_exact(text)
                } else {
                    self.lookup(text)
                }
            })
            .collect();
        if let Some(value) = term.integer {
            postings.extend(self.lookup_integer(value));
        }
        postings
    }

    /// Whether `key` currently has any postings.
    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.forward.contains_key(key)
    }

    /// Number of distinct terms across all dictionaries.
    pub fn term_count(&self) -> usize {
        self.prefix_terms.len() + self.exact_terms.len() + self.integer_terms.len()
    }

    /// Total number of postings.
    pub fn posting_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }

    /// Number of documents with at least one posting.
    pub fn document_count(&self) -> usize {
        self.forward.len()
    }

    pub fn clear(&mut self) {
        self.prefix_terms.clear();
        self.exact_terms.clear();
        self.integer_terms.clear();
        self.forward.clear();
    }

    fn dictionary_mut(&mut self, dictionary: Dictionary) -> &mut TermDictionary {
        match dictionary {
            Dictionary::Prefix => &mut self.prefix_terms,
            Dictionary::Exact => &mut self.exact_terms,
            Dictionary::Integer => &mut self.integer_terms,
        }
    }
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InvertedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvertedIndex")
            .field("analyzer", &self.analyzer.name())
            .field("prefix_terms", &self.prefix_terms.len())
            .field("exact_terms", &self.exact_terms.len())
            .field("integer_terms", &self.integer_terms.len())
            .field("documents", &self.forward.len())
            .finish()
    }
}
