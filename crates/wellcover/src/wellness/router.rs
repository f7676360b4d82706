use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::service::{MealCapture, WellnessService, WellnessServiceError};
use crate::ledger::{MealItem, StateRepository};
use crate::signals::HealthDataProvider;

/// Body for logging a meal whose items were recognized elsewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct MealEvaluationRequest {
    pub verified: bool,
    pub items: Vec<MealItem>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Optional day override (`YYYY-MM-DD`); defaults to the local calendar day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayQuery {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl DayQuery {
    fn resolve(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Router builder exposing meal, score, and policy endpoints.
///
/// The photo capture route is only mounted when the service has capture
/// collaborators wired in.
pub fn wellness_router<R, H>(service: Arc<WellnessService<R, H>>) -> Router
where
    R: StateRepository + 'static,
    H: HealthDataProvider + 'static,
{
    let mut router =
        Router::new().route("/api/v1/meals/evaluate", post(evaluate_handler::<R, H>));
    if service.accepts_captures() {
        router = router.route("/api/v1/meals/capture", post(capture_handler::<R, H>));
    }

    router
        .route("/api/v1/scores", get(scores_handler::<R, H>))
        .route("/api/v1/scores/update", post(update_handler::<R, H>))
        .route("/api/v1/policy", get(policy_handler::<R, H>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<R, H>(
    State(service): State<Arc<WellnessService<R, H>>>,
    Json(request): Json<MealEvaluationRequest>,
) -> Response
where
    R: StateRepository + 'static,
    H: HealthDataProvider + 'static,
{
    let MealEvaluationRequest {
        verified,
        items,
        date,
    } = request;
    let today = date.unwrap_or_else(|| Local::now().date_naive());

    match service.evaluate_meal(verified, items, today) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn capture_handler<R, H>(
    State(service): State<Arc<WellnessService<R, H>>>,
    Query(day): Query<DayQuery>,
    Json(capture): Json<MealCapture>,
) -> Response
where
    R: StateRepository + 'static,
    H: HealthDataProvider + 'static,
{
    match service.evaluate_capture(&capture, day.resolve()).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn scores_handler<R, H>(
    State(service): State<Arc<WellnessService<R, H>>>,
    Query(day): Query<DayQuery>,
) -> Response
where
    R: StateRepository + 'static,
    H: HealthDataProvider + 'static,
{
    match service.scores(day.resolve()).await {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R, H>(
    State(service): State<Arc<WellnessService<R, H>>>,
    Query(day): Query<DayQuery>,
) -> Response
where
    R: StateRepository + 'static,
    H: HealthDataProvider + 'static,
{
    match service.update_scores(day.resolve()).await {
        Ok(update) => (StatusCode::OK, Json(update)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn policy_handler<R, H>(
    State(service): State<Arc<WellnessService<R, H>>>,
) -> Response
where
    R: StateRepository + 'static,
    H: HealthDataProvider + 'static,
{
    match service.policy_details() {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: WellnessServiceError) -> Response {
    let status = err.status();
    if status.is_server_error() {
        warn!(error = %err, "wellness request failed");
    }

    let payload = json!({
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
