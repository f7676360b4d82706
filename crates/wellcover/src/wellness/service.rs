use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ledger::{MealItem, MealLogEntry, RepositoryError, StateRepository};
use crate::scoring::{
    DailyDietAggregator, HealthScoreTracker, PolicyPricer, PolicyQuote, PremiumCurve,
    ScoringError,
};
use crate::signals::{
    FaceVerifier, HealthDataProvider, HealthReading, ImageFetcher, MealRecognizer, UpstreamError,
};

/// Image references submitted for a photographed meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCapture {
    pub saved_face: String,
    pub test_face: String,
    pub meal: String,
}

/// Collaborators needed to evaluate a meal straight from its photos.
#[derive(Clone)]
pub struct CaptureCollaborators {
    pub images: Arc<dyn ImageFetcher>,
    pub faces: Arc<dyn FaceVerifier>,
    pub meals: Arc<dyn MealRecognizer>,
}

/// Current scores as exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    pub health_score: i64,
    pub activity_score: i64,
    pub sleep_score: i64,
    pub diet_score: u32,
}

impl ScoreBoard {
    pub fn new(reading: HealthReading, diet_score: u32) -> Self {
        Self {
            health_score: HealthScoreTracker::combine(
                reading.activity_score,
                reading.sleep_score,
                f64::from(diet_score),
            ),
            activity_score: reading.activity_score.trunc() as i64,
            sleep_score: reading.sleep_score.trunc() as i64,
            diet_score,
        }
    }
}

/// Outcome of folding one sample into the running health score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub sample: i64,
    pub update_count: u32,
    pub running_health_score: f64,
    pub premium_adjustment_pct: f64,
}

/// Service composing the state repository, health provider, and scoring rules.
///
/// Every write is a read-modify-write of one record and runs under a single
/// transaction lock; collaborator calls happen before the lock is taken.
pub struct WellnessService<R, H> {
    repository: Arc<R>,
    health: Arc<H>,
    capture: Option<CaptureCollaborators>,
    curve: PremiumCurve,
    transactions: Mutex<()>,
}

impl<R, H> WellnessService<R, H>
where
    R: StateRepository + 'static,
    H: HealthDataProvider + 'static,
{
    pub fn new(repository: Arc<R>, health: Arc<H>, curve: PremiumCurve) -> Self {
        Self {
            repository,
            health,
            capture: None,
            curve,
            transactions: Mutex::new(()),
        }
    }

    pub fn with_capture(mut self, capture: CaptureCollaborators) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn accepts_captures(&self) -> bool {
        self.capture.is_some()
    }

    pub fn curve(&self) -> PremiumCurve {
        self.curve
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Score a recognized meal and append it to the user's log.
    pub fn evaluate_meal(
        &self,
        verified: bool,
        items: Vec<MealItem>,
        today: NaiveDate,
    ) -> Result<MealLogEntry, WellnessServiceError> {
        let entry = MealLogEntry::record(verified, today, items)?;

        let _transaction = self.begin()?;
        let mut user = self.repository.load_user()?;
        user.meal_log.push(entry.clone());
        self.repository.store_user(&user)?;

        info!(
            verified,
            calories = entry.meal_calories,
            weighted_score = entry.meal_score_weighted,
            "meal logged"
        );
        Ok(entry)
    }

    /// Download the capture images, verify the face, recognize the meal, and log it.
    pub async fn evaluate_capture(
        &self,
        capture: &MealCapture,
        today: NaiveDate,
    ) -> Result<MealLogEntry, WellnessServiceError> {
        let collaborators = self
            .capture
            .as_ref()
            .ok_or(WellnessServiceError::CaptureUnavailable)?;

        let saved_face = collaborators.images.fetch(&capture.saved_face).await?;
        let test_face = collaborators.images.fetch(&capture.test_face).await?;
        let meal = collaborators.images.fetch(&capture.meal).await?;

        let verified = collaborators
            .faces
            .same_person(&saved_face, &test_face)
            .await?;
        let items = collaborators.meals.recognize(&meal).await?;
        debug!(verified, items = items.len(), "meal capture recognized");

        self.evaluate_meal(verified, items, today)
    }

    pub fn diet_score(&self, today: NaiveDate) -> Result<u32, WellnessServiceError> {
        let user = self.repository.load_user()?;
        Ok(DailyDietAggregator::compute(
            &user.meal_log,
            today,
            user.calorie_target,
            user.max_daily_score,
        ))
    }

    pub async fn scores(&self, today: NaiveDate) -> Result<ScoreBoard, WellnessServiceError> {
        let reading = self.health.current().await?;
        let diet_score = self.diet_score(today)?;
        Ok(ScoreBoard::new(reading, diet_score))
    }

    /// Fold today's combined score into the running score and reprice.
    pub async fn update_scores(&self, today: NaiveDate) -> Result<ScoreUpdate, WellnessServiceError> {
        let board = self.scores(today).await?;
        self.apply_sample(board.health_score)
    }

    pub fn apply_sample(&self, sample: i64) -> Result<ScoreUpdate, WellnessServiceError> {
        let _transaction = self.begin()?;
        let mut policy = self.repository.load_policy()?;

        let track = HealthScoreTracker::update(policy.track(), sample)?;
        let premium_adjustment_pct = self.curve.adjustment(track.running_health_score);
        policy.advance(track, premium_adjustment_pct);
        self.repository.store_policy(&policy)?;

        info!(
            sample,
            update_count = track.update_count,
            running_health_score = track.running_health_score,
            premium_adjustment_pct,
            "health score updated"
        );

        Ok(ScoreUpdate {
            sample,
            update_count: track.update_count,
            running_health_score: track.running_health_score,
            premium_adjustment_pct,
        })
    }

    pub fn policy_details(&self) -> Result<PolicyQuote, WellnessServiceError> {
        let policy = self.repository.load_policy()?;
        Ok(PolicyPricer::quote(&policy))
    }

    fn begin(&self) -> Result<MutexGuard<'_, ()>, WellnessServiceError> {
        self.transactions.lock().map_err(|_| {
            RepositoryError::Unavailable("state transaction lock poisoned".to_string()).into()
        })
    }
}

/// Error raised by the wellness service.
#[derive(Debug, thiserror::Error)]
pub enum WellnessServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("meal capture collaborators are not configured")]
    CaptureUnavailable,
}

impl WellnessServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            WellnessServiceError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WellnessServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
            WellnessServiceError::CaptureUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            WellnessServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
