//! Lexical search adapter.
//!
//! Issues the ranked lexical query against the external text-index store and
//! maps its rows into the uniform [`SearchResult`] shape. An empty match
//! expression short-circuits without contacting the store.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::analysis::QueryAnalysis;
use crate::error::{Result, XiphosError};
use crate::hybrid::types::{MatchKind, ResultPage, SearchResult};
use crate::lexical::store::TextIndexStore;

/// Default deadline for one text-index query.
pub const DEFAULT_LEXICAL_TIMEOUT: Duration = Duration::from_millis(500);

/// Adapter over the external text-index store.
#[derive(Clone)]
pub struct LexicalSearchAdapter {
    store: Arc<dyn TextIndexStore>,
    timeout: Duration,
}

impl LexicalSearchAdapter {
    /// Create a new adapter with the default timeout.
    pub fn new(store: Arc<dyn TextIndexStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_LEXICAL_TIMEOUT,
        }
    }

    /// Set the per-call store deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute a lexical search for the analyzed query.
    ///
    /// Returns a page of [`MatchKind::Lexical`] results in the store's
    /// descending score order. Store errors and deadline overruns surface as
    /// `Err`; the orchestrator absorbs those as an empty sub-result.
    pub async fn search(
        &self,
        analysis: &QueryAnalysis,
        limit: usize,
        offset: usize,
    ) -> Result<ResultPage> {
        if analysis.is_empty() {
            return Ok(ResultPage::empty());
        }

        let hits = tokio::time::timeout(
            self.timeout,
            self.store
                .query_lexical(&analysis.match_expression, limit, offset),
        )
        .await
        .map_err(|_| XiphosError::timeout("lexical search"))??;

        debug!(
            matches = hits.rows.len(),
            total = hits.total,
            "lexical search returned"
        );

        let results = hits
            .rows
            .into_iter()
            .map(|row| {
                let mut result =
                    SearchResult::new(row.id, row.title, row.snippet, row.score, MatchKind::Lexical);
                result.created_at = row.created_at;
                result.updated_at = row.updated_at;
                result
            })
            .collect();

        Ok(ResultPage::new(results, hits.total))
    }
}
