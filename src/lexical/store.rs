//! Seam to the external text-index store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// One row returned by the text-index store, in store ranking order.
#[derive(Debug, Clone)]
pub struct LexicalRow {
    /// Opaque document identifier.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Relevance score, title-field matches weighted above body-field matches.
    pub score: f32,
    /// Highlighted snippet built from the query terms.
    pub snippet: String,
    /// Document creation time, when tracked.
    pub created_at: Option<DateTime<Utc>>,
    /// Document update time, when tracked.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A ranked page of rows plus the full match count.
#[derive(Debug, Clone, Default)]
pub struct LexicalHits {
    /// Rows in descending score order.
    pub rows: Vec<LexicalRow>,
    /// Total match count independent of limit/offset.
    pub total: usize,
}

/// Trait for the external text-index store.
///
/// Implementations must rank with higher weight on title-field matches than
/// body-field matches and produce highlighted snippets from the expression's
/// terms. Tokenization, stemming, and snippet formatting are the store's
/// concern; none of its row types leak past [`LexicalRow`].
#[async_trait]
pub trait TextIndexStore: Send + Sync {
    /// Execute a ranked query for the given boolean match expression.
    ///
    /// # Arguments
    ///
    /// * `match_expression` - OR-joined term expression from query analysis
    /// * `limit` - Maximum rows to return
    /// * `offset` - Rows to skip
    async fn query_lexical(
        &self,
        match_expression: &str,
        limit: usize,
        offset: usize,
    ) -> Result<LexicalHits>;
}
