use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::ledger::{MealItem, PolicyState, RepositoryError, StateRepository, UserState};
use crate::scoring::PremiumCurve;
use crate::signals::{
    FaceVerifier, HealthDataProvider, HealthReading, ImageFetcher, MealRecognizer, UpstreamError,
};
use crate::wellness::{wellness_router, CaptureCollaborators, WellnessService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date")
}

pub(super) fn reading(activity_score: f64, sleep_score: f64) -> HealthReading {
    HealthReading {
        activity_score,
        sleep_score,
    }
}

pub(super) fn balanced_meal() -> Vec<MealItem> {
    vec![
        MealItem {
            score: 0.9,
            calories: 300.0,
            name: Some("lentil soup".to_string()),
        },
        MealItem {
            score: 0.5,
            calories: 200.0,
            name: Some("bread".to_string()),
        },
    ]
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) user: Mutex<UserState>,
    pub(super) policy: Mutex<PolicyState>,
}

impl MemoryRepository {
    pub(super) fn user(&self) -> UserState {
        self.user.lock().expect("user mutex poisoned").clone()
    }

    pub(super) fn policy(&self) -> PolicyState {
        self.policy.lock().expect("policy mutex poisoned").clone()
    }
}

impl StateRepository for MemoryRepository {
    fn load_user(&self) -> Result<UserState, RepositoryError> {
        Ok(self.user())
    }

    fn store_user(&self, state: &UserState) -> Result<(), RepositoryError> {
        *self.user.lock().expect("user mutex poisoned") = state.clone();
        Ok(())
    }

    fn load_policy(&self) -> Result<PolicyState, RepositoryError> {
        Ok(self.policy())
    }

    fn store_policy(&self, state: &PolicyState) -> Result<(), RepositoryError> {
        *self.policy.lock().expect("policy mutex poisoned") = state.clone();
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl StateRepository for UnavailableRepository {
    fn load_user(&self) -> Result<UserState, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn store_user(&self, _state: &UserState) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn load_policy(&self) -> Result<PolicyState, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn store_policy(&self, _state: &PolicyState) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) struct FixedHealth(pub(super) HealthReading);

#[async_trait]
impl HealthDataProvider for FixedHealth {
    async fn current(&self) -> Result<HealthReading, UpstreamError> {
        Ok(self.0)
    }
}

pub(super) struct OfflineHealth;

#[async_trait]
impl HealthDataProvider for OfflineHealth {
    async fn current(&self) -> Result<HealthReading, UpstreamError> {
        Err(UpstreamError::request("fitness", "token expired"))
    }
}

#[derive(Default)]
pub(super) struct MapFetcher {
    pub(super) images: HashMap<String, Vec<u8>>,
}

#[async_trait]
impl ImageFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| UpstreamError::request("image download", format!("404 for {url}")))
    }
}

/// Same person when both images carry the same first byte.
pub(super) struct FirstByteVerifier;

#[async_trait]
impl FaceVerifier for FirstByteVerifier {
    async fn same_person(&self, saved: &[u8], candidate: &[u8]) -> Result<bool, UpstreamError> {
        Ok(saved.first() == candidate.first())
    }
}

pub(super) struct CannedRecognizer(pub(super) Vec<MealItem>);

#[async_trait]
impl MealRecognizer for CannedRecognizer {
    async fn recognize(&self, _meal: &[u8]) -> Result<Vec<MealItem>, UpstreamError> {
        Ok(self.0.clone())
    }
}

pub(super) fn capture_collaborators(items: Vec<MealItem>) -> CaptureCollaborators {
    let mut fetcher = MapFetcher::default();
    fetcher
        .images
        .insert("https://img.test/saved.jpg".to_string(), vec![7, 1, 1]);
    fetcher
        .images
        .insert("https://img.test/selfie.jpg".to_string(), vec![7, 2, 2]);
    fetcher
        .images
        .insert("https://img.test/stranger.jpg".to_string(), vec![9, 2, 2]);
    fetcher
        .images
        .insert("https://img.test/meal.jpg".to_string(), vec![0, 0, 0]);

    CaptureCollaborators {
        images: Arc::new(fetcher),
        faces: Arc::new(FirstByteVerifier),
        meals: Arc::new(CannedRecognizer(items)),
    }
}

pub(super) fn build_service(
    health: HealthReading,
) -> (
    WellnessService<MemoryRepository, FixedHealth>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = WellnessService::new(
        repository.clone(),
        Arc::new(FixedHealth(health)),
        PremiumCurve::default(),
    )
    .with_capture(capture_collaborators(balanced_meal()));
    (service, repository)
}

pub(super) fn router_with_service(
    service: WellnessService<MemoryRepository, FixedHealth>,
) -> axum::Router {
    wellness_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
