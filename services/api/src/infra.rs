use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use wellcover::ledger::{MealItem, PolicyState, RepositoryError, StateRepository, UserState};
use wellcover::signals::{
    FaceEmbedder, FitnessMetrics, FitnessSource, ImageFetcher, MealRecognizer, UpstreamError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Holds the most recent tracker readings pushed to the service.
#[derive(Default)]
pub(crate) struct LatestMetricsFeed {
    latest: Mutex<Option<FitnessMetrics>>,
}

impl LatestMetricsFeed {
    pub(crate) fn record(&self, metrics: FitnessMetrics) {
        *self.latest.lock().expect("metrics feed mutex poisoned") = Some(metrics);
    }
}

#[async_trait]
impl FitnessSource for LatestMetricsFeed {
    async fn metrics(&self) -> Result<FitnessMetrics, UpstreamError> {
        let latest = *self.latest.lock().expect("metrics feed mutex poisoned");
        latest.ok_or_else(|| UpstreamError::request("fitness", "no tracker metrics received yet"))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryStateRepository {
    user: Mutex<UserState>,
    policy: Mutex<PolicyState>,
}

impl StateRepository for InMemoryStateRepository {
    fn load_user(&self) -> Result<UserState, RepositoryError> {
        let guard = self.user.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn store_user(&self, state: &UserState) -> Result<(), RepositoryError> {
        let mut guard = self.user.lock().expect("repository mutex poisoned");
        *guard = state.clone();
        Ok(())
    }

    fn load_policy(&self) -> Result<PolicyState, RepositoryError> {
        let guard = self.policy.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn store_policy(&self, state: &PolicyState) -> Result<(), RepositoryError> {
        let mut guard = self.policy.lock().expect("repository mutex poisoned");
        *guard = state.clone();
        Ok(())
    }
}

/// Serves images from memory, keyed by URL.
#[derive(Default)]
pub(crate) struct InMemoryImageFetcher {
    images: HashMap<String, Vec<u8>>,
}

impl InMemoryImageFetcher {
    pub(crate) fn with_image(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(url.to_string(), bytes);
        self
    }
}

#[async_trait]
impl ImageFetcher for InMemoryImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| UpstreamError::request("image download", format!("no image at {url}")))
    }
}

/// Treats normalized pixel intensities as the embedding.
pub(crate) struct PixelEmbedder;

#[async_trait]
impl FaceEmbedder for PixelEmbedder {
    async fn embed(&self, image: &[u8]) -> Result<Vec<f64>, UpstreamError> {
        if image.is_empty() {
            return Err(UpstreamError::invalid("face embedder", "no face detected"));
        }
        Ok(image.iter().map(|px| f64::from(*px) / 255.0).collect())
    }
}

/// Recognizer returning a fixed plate regardless of the photo.
pub(crate) struct FixedPlateRecognizer {
    pub(crate) items: Vec<MealItem>,
}

#[async_trait]
impl MealRecognizer for FixedPlateRecognizer {
    async fn recognize(&self, _meal: &[u8]) -> Result<Vec<MealItem>, UpstreamError> {
        Ok(self.items.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
