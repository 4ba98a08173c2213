//! Text embedding trait for the semantic search pipeline.

use async_trait::async_trait;

use crate::error::Result;

/// Trait for converting query text to vector embeddings.
///
/// This trait is the seam to the external embedding provider (local neural
/// models, API-based services, etc.). A failing provider or an empty returned
/// vector is treated upstream as "no semantic signal available", not as a
/// request failure.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use xiphos::embedding::TextEmbedder;
/// use xiphos::error::Result;
///
/// struct MyEmbedder {
///     dimension: usize,
/// }
///
/// #[async_trait]
/// impl TextEmbedder for MyEmbedder {
///     async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
///         Ok(vec![0.0; self.dimension])
///     }
///
///     fn dimension(&self) -> usize {
///         self.dimension
///     }
/// }
/// ```
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to embed
    ///
    /// # Returns
    ///
    /// A vector representation of the input text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder.
    ///
    /// Useful for logging and debugging purposes.
    fn name(&self) -> &str {
        "unknown"
    }
}
