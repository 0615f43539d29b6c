//! Deterministic pseudo-embedder.
//!
//! Produces a 384-dimensional vector (the output size of MiniLM-class
//! sentence models) from the character codes of the lower-cased topic. It
//! carries no semantics; it only guarantees that equal topics map to equal
//! vectors and that the vectors are unit length.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tracing::debug;

use super::{EmbedResult, TopicEmbedder};
use crate::config::simulate;
use crate::models::EmbeddingResult;

/// Dimension of the pseudo-embeddings.
pub const PSEUDO_EMBEDDING_DIMENSION: usize = 384;

const MODEL_NAME: &str = "pseudo-minilm-384";

/// Character-code based embedder with a simulated model latency.
#[derive(Debug, Clone)]
pub struct PseudoEmbedder {
    /// Simulated inference latency in milliseconds
    latency_ms: u64,
}

impl PseudoEmbedder {
    /// Create a new pseudo-embedder.
    ///
    /// # Arguments
    /// * `latency_ms` - Simulated inference latency, 0 to disable
    pub fn new(latency_ms: u64) -> Self {
        Self { latency_ms }
    }
}

impl Default for PseudoEmbedder {
    fn default() -> Self {
        Self::new(500)
    }
}

#[async_trait]
impl TopicEmbedder for PseudoEmbedder {
    async fn embed(&self, topic: &str) -> EmbedResult<EmbeddingResult> {
        simulate(self.latency_ms).await;

        let embedding = pseudo_embedding(topic);
        debug!(topic, dimension = embedding.len(), "Generated pseudo-embedding");

        Ok(EmbeddingResult {
            embedding,
            topic: topic.to_string(),
            timestamp: now_millis(),
        })
    }

    fn dimension(&self) -> usize {
        PSEUDO_EMBEDDING_DIMENSION
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}

/// Compute the normalized pseudo-embedding of `text`.
///
/// For every dimension `i` the UTF-16 code units `c` of the lower-cased text
/// are summed as `c * ((pos + i + 1) % 17)`, mapped through
/// `sin(sum * (i + 1) * 0.001) * 0.5 + 0.5` into `[0, 1]`, and the whole
/// vector is L2-normalized.
pub fn pseudo_embedding(text: &str) -> Vec<f32> {
    let codes: Vec<f64> = text
        .to_lowercase()
        .encode_utf16()
        .map(f64::from)
        .collect();

    let raw: Vec<f64> = (0..PSEUDO_EMBEDDING_DIMENSION)
        .map(|i| {
            let char_sum: f64 = codes
                .iter()
                .enumerate()
                .map(|(pos, code)| code * ((pos + i + 1) % 17) as f64)
                .sum();
            (char_sum * (i + 1) as f64 * 0.001).sin() * 0.5 + 0.5
        })
        .collect();

    let magnitude = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
    if magnitude == 0.0 {
        return raw.into_iter().map(|v| v as f32).collect();
    }
    raw.into_iter().map(|v| (v / magnitude) as f32).collect()
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
