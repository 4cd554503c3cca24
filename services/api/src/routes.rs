use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use dinewise::questionnaire::{recommender_router, RecommenderService, SessionStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_recommender_routes<S>(service: Arc<RecommenderService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    recommender_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemorySessionStore;
    use axum::body::Body;
    use axum::http::Request;
    use dinewise::config::RecommenderConfig;
    use dinewise::questionnaire::Recommender;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app_state() -> AppState {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(handle),
        }
    }

    fn app(state: AppState) -> axum::Router {
        let recommender = Arc::new(
            Recommender::from_config(&RecommenderConfig::default()).expect("bundled rules load"),
        );
        let service = Arc::new(RecommenderService::new(
            recommender,
            Arc::new(InMemorySessionStore::new(Duration::from_secs(60))),
        ));
        with_recommender_routes(service).layer(Extension(state))
    }

    async fn status_of(router: axum::Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn readiness_follows_the_startup_flag() {
        let state = app_state();
        assert_eq!(
            status_of(app(state.clone()), "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        state.readiness.store(true, Ordering::Release);
        assert_eq!(status_of(app(state), "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_metrics_are_served_next_to_the_questionnaire() {
        let state = app_state();
        assert_eq!(status_of(app(state.clone()), "/health").await, StatusCode::OK);
        assert_eq!(status_of(app(state.clone()), "/metrics").await, StatusCode::OK);
        assert_eq!(
            status_of(app(state), "/api/v1/questions").await,
            StatusCode::OK
        );
    }
}
