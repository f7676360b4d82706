use async_trait::async_trait;

use super::{FaceVerifier, UpstreamError};

const COLLABORATOR: &str = "face embedder";

/// Produces a face embedding for the most prominent face in an image.
#[async_trait]
pub trait FaceEmbedder: Send + Sync {
    async fn embed(&self, image: &[u8]) -> Result<Vec<f64>, UpstreamError>;
}

/// Either test passing is enough to accept a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMatchThresholds {
    pub max_distance: f64,
    pub min_similarity: f64,
}

impl Default for FaceMatchThresholds {
    fn default() -> Self {
        Self {
            max_distance: 0.6,
            min_similarity: 0.7,
        }
    }
}

/// Face verifier comparing embeddings by euclidean distance and cosine similarity.
pub struct EmbeddingFaceVerifier<E> {
    embedder: E,
    thresholds: FaceMatchThresholds,
}

impl<E> EmbeddingFaceVerifier<E> {
    pub fn new(embedder: E) -> Self {
        Self::with_thresholds(embedder, FaceMatchThresholds::default())
    }

    pub fn with_thresholds(embedder: E, thresholds: FaceMatchThresholds) -> Self {
        Self {
            embedder,
            thresholds,
        }
    }

    pub fn matches(&self, saved: &[f64], candidate: &[f64]) -> Result<bool, UpstreamError> {
        if saved.is_empty() || saved.len() != candidate.len() {
            return Err(UpstreamError::invalid(
                COLLABORATOR,
                format!(
                    "embedding dimensions differ ({} vs {})",
                    saved.len(),
                    candidate.len()
                ),
            ));
        }

        let distance = euclidean_distance(saved, candidate);
        let similarity = cosine_similarity(saved, candidate);

        Ok(distance <= self.thresholds.max_distance
            || similarity >= self.thresholds.min_similarity)
    }
}

#[async_trait]
impl<E> FaceVerifier for EmbeddingFaceVerifier<E>
where
    E: FaceEmbedder,
{
    async fn same_person(&self, saved: &[u8], candidate: &[u8]) -> Result<bool, UpstreamError> {
        let saved = self.embedder.embed(saved).await?;
        let candidate = self.embedder.embed(candidate).await?;
        self.matches(&saved, &candidate)
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Zero-length vectors have no direction and score 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
