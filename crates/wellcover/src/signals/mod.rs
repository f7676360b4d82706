//! Interfaces to the external data sources the engine consumes: face
//! verification, meal recognition, fitness readings, and image download.

pub mod face;
pub mod fitness;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ledger::MealItem;

pub use face::{EmbeddingFaceVerifier, FaceEmbedder, FaceMatchThresholds};
pub use fitness::{FitnessMetrics, FitnessSource, MetricsHealthProvider};

/// Activity and sleep scores for the current period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthReading {
    pub activity_score: f64,
    pub sleep_score: f64,
}

/// Decides whether two face images show the same person.
#[async_trait]
pub trait FaceVerifier: Send + Sync {
    async fn same_person(&self, saved: &[u8], candidate: &[u8]) -> Result<bool, UpstreamError>;
}

/// Breaks a meal photo down into scored food items.
#[async_trait]
pub trait MealRecognizer: Send + Sync {
    async fn recognize(&self, meal: &[u8]) -> Result<Vec<MealItem>, UpstreamError>;
}

/// Supplies the activity and sleep scores for the current period.
#[async_trait]
pub trait HealthDataProvider: Send + Sync {
    async fn current(&self) -> Result<HealthReading, UpstreamError>;
}

/// Downloads an image referenced by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError>;
}

/// Failure reported by an external collaborator. Never retried here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("{collaborator} request failed: {message}")]
    Request {
        collaborator: &'static str,
        message: String,
    },
    #[error("{collaborator} returned an unusable response: {message}")]
    InvalidResponse {
        collaborator: &'static str,
        message: String,
    },
}

impl UpstreamError {
    pub fn request(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Request {
            collaborator,
            message: message.into(),
        }
    }

    pub fn invalid(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            collaborator,
            message: message.into(),
        }
    }
}
