use crate::cli::ServeArgs;
use crate::infra::{build_recommender, load_config, AppState, InMemorySessionStore};
use crate::routes::with_recommender_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use dinewise::config::AppConfig;
use dinewise::error::AppError;
use dinewise::questionnaire::RecommenderService;
use dinewise::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = load_config(&args.recommender)?;
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let state = AppState {
        readiness: Arc::new(AtomicBool::new(false)),
        metrics: Arc::new(prometheus_handle),
    };
    let readiness = state.readiness.clone();
    let app = build_app(&config, state)?.layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);
    info!(
        ?config.environment,
        %addr,
        session_ttl_secs = config.sessions.ttl.as_secs(),
        "restaurant recommender ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Questionnaire and operational routes over a fresh session store. Rule loading happens here,
/// so a malformed table stops startup before the listener is bound.
fn build_app(config: &AppConfig, state: AppState) -> Result<Router, AppError> {
    let recommender = build_recommender(config)?;
    let store = Arc::new(InMemorySessionStore::new(config.sessions.ttl));
    let service = Arc::new(RecommenderService::new(recommender, store));
    Ok(with_recommender_routes(service).layer(Extension(state)))
}
