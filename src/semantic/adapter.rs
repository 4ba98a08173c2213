//! Semantic search adapter.
//!
//! Obtains a query embedding from the external provider and issues a
//! similarity query against the external vector store. A failing provider or
//! an empty embedding means "no semantic signal available" and produces an
//! empty page rather than an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::embedding::TextEmbedder;
use crate::error::{Result, XiphosError};
use crate::hybrid::types::{MatchKind, ResultPage, SearchResult};
use crate::semantic::store::VectorStore;

/// Default deadline for one embedding request.
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(5);

/// Default deadline for one vector-store query.
pub const DEFAULT_VECTOR_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum snippet length for semantic hits, in characters.
const SNIPPET_MAX_CHARS: usize = 200;

/// Adapter over the embedding provider and the external vector store.
#[derive(Clone)]
pub struct SemanticSearchAdapter {
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn VectorStore>,
    embed_timeout: Duration,
    search_timeout: Duration,
}

impl SemanticSearchAdapter {
    /// Create a new adapter with default timeouts.
    pub fn new(embedder: Arc<dyn TextEmbedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            search_timeout: DEFAULT_VECTOR_TIMEOUT,
        }
    }

    /// Set the embedding deadline.
    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    /// Set the vector-store deadline.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Execute a semantic search for the raw query text.
    ///
    /// Returns a page of [`MatchKind::Semantic`] results with
    /// `score = 1 - cosine_distance`. Embedding failures yield an empty page;
    /// vector-store errors and deadline overruns surface as `Err` and are
    /// absorbed upstream.
    pub async fn search(
        &self,
        raw_query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<ResultPage> {
        if raw_query.trim().is_empty() {
            return Ok(ResultPage::empty());
        }

        let vector = match tokio::time::timeout(
            self.embed_timeout,
            self.embedder.embed(raw_query.trim()),
        )
        .await
        {
            Ok(Ok(vector)) => vector,
            Ok(Err(e)) => {
                warn!(embedder = self.embedder.name(), error = %e, "embedding failed");
                return Ok(ResultPage::empty());
            }
            Err(_) => {
                warn!(embedder = self.embedder.name(), "embedding timed out");
                return Ok(ResultPage::empty());
            }
        };

        if vector.is_empty() {
            warn!(
                embedder = self.embedder.name(),
                "embedder returned an empty vector"
            );
            return Ok(ResultPage::empty());
        }

        let rows = tokio::time::timeout(
            self.search_timeout,
            self.store.query_similar(&vector, limit, offset),
        )
        .await
        .map_err(|_| XiphosError::timeout("vector search"))??;

        debug!(matches = rows.len(), "vector search returned");

        let total = rows.len();
        let results = rows
            .into_iter()
            .map(|row| {
                let score = (1.0 - row.cosine_distance).max(0.0);
                let mut result = SearchResult::new(
                    row.id,
                    row.title,
                    truncate_snippet(&row.chunk_text),
                    score,
                    MatchKind::Semantic,
                );
                result.created_at = row.created_at;
                result.updated_at = row.updated_at;
                result
            })
            .collect();

        Ok(ResultPage::new(results, total))
    }
}

/// Truncate a passage to at most [`SNIPPET_MAX_CHARS`] characters, appending
/// an ellipsis when anything was cut. Counts characters, not bytes, so
/// multi-byte text never splits mid-character.
fn truncate_snippet(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(SNIPPET_MAX_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
