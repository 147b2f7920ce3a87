//! Search results and their page-by-page iterator.

use std::sync::Arc;

use crate::document::Document;
use crate::error::Result;
use crate::query::engine::ScoredDocument;
use crate::query::spec::SearchSpec;
use crate::session::core::SessionCore;
use crate::session::session::run_blocking;

/// One search hit.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub document: Document,
    /// Fields that matched at least one query term; empty for an empty
    /// query.
    pub matched_fields: Vec<String>,
    /// The value the result was ranked by (score, timestamp or zero).
    pub ranking_signal: i64,
}

impl From<&ScoredDocument> for SearchResult {
    fn from(scored: &ScoredDocument) -> Self {
        SearchResult {
            document: scored.document.as_ref().clone(),
            matched_fields: scored.matched_fields.clone(),
            ranking_signal: scored.ranking_signal,
        }
    }
}

/// Lazily evaluated, paginated results of a search.
///
/// The query runs on the first call to [`next_page`](Self::next_page); later
/// pages slice that same result set, so writes made while paging do not
/// shift results between pages. Once exhausted, `next_page` keeps returning
/// an empty page. To see fresh results, search again.
#[derive(Debug)]
pub struct SearchResults {
    core: Arc<SessionCore>,
    query: String,
    spec: SearchSpec,
    page_size: usize,
    matches: Option<Arc<[ScoredDocument]>>,
    offset: usize,
}

impl SearchResults {
    pub(crate) fn new(
        core: Arc<SessionCore>,
        query: String,
        spec: SearchSpec,
        page_size: usize,
    ) -> Self {
        SearchResults {
            core,
            query,
            spec,
            page_size,
            matches: None,
            offset: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total number of matches, known once the first page was fetched.
    pub fn total_hits(&self) -> Option<usize> {
        self.matches.as_ref().map(|matches| matches.len())
    }

    /// Fetch the next page of results.
    ///
    /// Fails with `SessionClosed` once the session is closed.
    pub async fn next_page(&mut self) -> Result<Vec<SearchResult>> {
        self.core.ensure_open()?;

        let matches = match &self.matches {
            Some(matches) => Arc::clone(matches),
            None => {
                let query = self.query.clone();
                let spec = self.spec.clone();
                let found =
                    run_blocking(&self.core, move |core| core.search(&query, &spec)).await?;
                let found: Arc<[ScoredDocument]> = found.into();
                self.matches = Some(Arc::clone(&found));
                found
            }
        };

        let end = self.offset.saturating_add(self.page_size).min(matches.len());
        let page = matches[self.offset..end]
            .iter()
            .map(SearchResult::from)
            .collect();
        self.offset = end;
        Ok(page)
    }
}
