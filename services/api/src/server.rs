use crate::cli::ServeArgs;
use crate::infra::{AppState, LatestMetricsFeed};
use crate::routes::with_wellness_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use wellcover::config::AppConfig;
use wellcover::error::AppError;
use wellcover::ledger::JsonFileStateStore;
use wellcover::signals::MetricsHealthProvider;
use wellcover::telemetry;
use wellcover::wellness::WellnessService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(state_dir) = args.state_dir.take() {
        config.storage.state_dir = state_dir;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(JsonFileStateStore::open(&config.storage.state_dir)?);
    let feed = Arc::new(LatestMetricsFeed::default());
    let health = Arc::new(MetricsHealthProvider::new(feed.clone()));
    let service = Arc::new(WellnessService::new(
        store,
        health,
        config.scoring.curve(),
    ));

    let accepts_captures = service.accepts_captures();
    let app = with_wellness_routes(service, feed)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        state_dir = %config.storage.state_dir.display(),
        accepts_captures,
        "wellness scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
