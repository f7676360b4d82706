use crate::infra::{AppState, LatestMetricsFeed};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use wellcover::ledger::StateRepository;
use wellcover::signals::{FitnessMetrics, HealthDataProvider};
use wellcover::wellness::{wellness_router, WellnessService};

pub(crate) fn with_wellness_routes<R, H>(
    service: Arc<WellnessService<R, H>>,
    feed: Arc<LatestMetricsFeed>,
) -> Router
where
    R: StateRepository + 'static,
    H: HealthDataProvider + 'static,
{
    let fitness = Router::new()
        .route("/api/v1/fitness/metrics", post(fitness_metrics_endpoint))
        .with_state(feed);

    wellness_router(service)
        .merge(fitness)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn fitness_metrics_endpoint(
    State(feed): State<Arc<LatestMetricsFeed>>,
    Json(metrics): Json<FitnessMetrics>,
) -> impl IntoResponse {
    feed.record(metrics);
    let reading = metrics.reading();
    debug!(
        activity_score = reading.activity_score,
        sleep_score = reading.sleep_score,
        "tracker metrics received"
    );
    (StatusCode::ACCEPTED, Json(reading))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryStateRepository;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use wellcover::scoring::PremiumCurve;
    use wellcover::signals::MetricsHealthProvider;

    fn router() -> Router {
        let feed = Arc::new(LatestMetricsFeed::default());
        let service = Arc::new(WellnessService::new(
            Arc::new(InMemoryStateRepository::default()),
            Arc::new(MetricsHealthProvider::new(feed.clone())),
            PremiumCurve::default(),
        ));
        with_wellness_routes(service, feed)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn scores_wait_for_first_tracker_push() {
        let app = router();

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/scores?today=2025-01-10")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/fitness/metrics")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"steps":10000,"heart_points":25,"calories_burned":2000,"hours_slept":4}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .oneshot(
                Request::get("/api/v1/scores?today=2025-01-10")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["activityScore"], 100);
        assert_eq!(body["sleepScore"], 50);
        assert_eq!(body["dietScore"], 0);
        assert_eq!(body["healthScore"], 50);
    }

    #[tokio::test]
    async fn served_router_has_no_capture_route_without_collaborators() {
        let response = router()
            .oneshot(
                Request::post("/api/v1/meals/capture")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"saved_face":"mem://a","test_face":"mem://b","meal":"mem://c"}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
