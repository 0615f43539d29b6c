//! Topic embedding abstraction and implementations.
//!
//! This module defines the interface for turning a topic into a vector and
//! provides the deterministic pseudo-embedder used by the pipeline.
//!
//! The abstraction allows the pseudo-embedder to be swapped for a real
//! sentence-embedding model without changing the pipeline.

pub mod pseudo;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::EmbeddingResult;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model could not produce an embedding
    #[error("Model error: {0}")]
    ModelError(String),
}

/// Result type for embedding operations.
pub type EmbedResult<T> = Result<T, EmbeddingError>;

/// Trait for topic embedders.
///
/// The trait is async so model-backed embedders can run inference off the
/// caller's task.
///
/// # Example Usage
/// ```ignore
/// let embedder = PseudoEmbedder::new(0);
/// let result = embedder.embed("Hash Tables").await?;
/// assert_eq!(result.embedding.len(), embedder.dimension());
/// ```
#[async_trait]
pub trait TopicEmbedder: Send + Sync {
    /// Embed a topic.
    ///
    /// # Arguments
    /// * `topic` - The topic as entered by the user
    ///
    /// # Returns
    /// The normalized embedding together with the topic and a timestamp
    ///
    /// # Errors
    /// Returns `EmbeddingError` if the embedding cannot be produced
    async fn embed(&self, topic: &str) -> EmbedResult<EmbeddingResult>;

    /// Number of dimensions in the produced vectors.
    fn dimension(&self) -> usize;

    /// Identifier of the embedding model.
    fn model_name(&self) -> &str;
}

/// Compute cosine similarity between two vectors.
///
/// Vectors of different lengths are not comparable and score 0, as does any
/// comparison involving a zero vector.
///
/// # Example
/// ```
/// use study_forge::embedding::cosine_similarity;
///
/// assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
/// assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
