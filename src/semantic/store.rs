//! Seam to the external vector store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// One row returned by the vector store, in ascending distance order.
#[derive(Debug, Clone)]
pub struct VectorRow {
    /// Opaque document identifier.
    pub id: String,
    /// Document title.
    pub title: String,
    /// The stored passage the query vector matched.
    pub chunk_text: String,
    /// Cosine distance to the query vector (0.0 = identical).
    pub cosine_distance: f32,
    /// Document creation time, when tracked.
    pub created_at: Option<DateTime<Utc>>,
    /// Document update time, when tracked.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Trait for the external vector-similarity store.
///
/// Implementations return rows ordered by ascending cosine distance. Index
/// structure (exact scan, ANN) is the store's concern.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Execute a similarity query for the given embedding vector.
    ///
    /// # Arguments
    ///
    /// * `vector` - The query embedding
    /// * `limit` - Maximum rows to return
    /// * `offset` - Rows to skip
    async fn query_similar(
        &self,
        vector: &[f32],
        limit: usize,
        offset: usize,
    ) -> Result<Vec<VectorRow>>;
}
