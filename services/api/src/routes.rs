use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use job_portal::dispatch::ApiRequest;
use serde_json::json;

use crate::infra::{claims_from_headers, AppState};

/// Health, readiness, and metrics live beside the portal bridge; every
/// other path falls through to the dispatcher.
pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .fallback(portal_endpoint)
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

/// Bridge between HTTP and the dispatch event model: method, path, query,
/// body, and the gateway identity headers become one [`ApiRequest`].
/// Requests without verifiable identity never reach the dispatcher; that
/// refusal is the claims extractor's, not the portal's.
pub(crate) async fn portal_endpoint(
    Extension(state): Extension<AppState>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let claims = claims_from_headers(&headers);
    if claims.is_none() {
        let payload = json!({ "message": "Missing or invalid identity claims" });
        return (StatusCode::UNAUTHORIZED, Json(payload)).into_response();
    }

    let request = ApiRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: params,
        body: if body.is_empty() { None } else { Some(body) },
        claims,
    };

    let reply = state.dispatcher.dispatch(&request);
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.body)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use job_portal::config::MediaConfig;
    use job_portal::dispatch::Dispatcher;
    use job_portal::service::Services;
    use job_portal::store::SqlStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::util::ServiceExt;

    use super::*;
    use crate::infra::{LocalMediaStore, ROLE_HEADER, SUBJECT_HEADER};

    fn test_router() -> Router {
        let store = Arc::new(SqlStore::open_in_memory().expect("store opens"));
        let media = Arc::new(LocalMediaStore::new(&MediaConfig {
            base_url: "http://127.0.0.1:3000/media".to_string(),
            url_ttl_secs: 900,
        }));
        let dispatcher = Arc::new(Dispatcher::new(Services::new(store, media)));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(
                PrometheusBuilder::new()
                    .build_recorder()
                    .handle(),
            ),
            dispatcher,
        };
        router().layer(Extension(state))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    #[tokio::test]
    async fn health_is_open() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn api_requires_identity_headers() {
        let response = test_router()
            .oneshot(
                Request::get("/api/joblist")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bridged_requests_reach_the_dispatcher() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/joblist")
                    .header(SUBJECT_HEADER, "7c9a2e1f-0b4d-4c3a-9d2e-5f6a7b8c9d0e")
                    .header(ROLE_HEADER, "ADMIN")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["total"], 0);

        let response = router
            .oneshot(
                Request::get("/api/nope")
                    .header(SUBJECT_HEADER, "7c9a2e1f-0b4d-4c3a-9d2e-5f6a7b8c9d0e")
                    .header(ROLE_HEADER, "ADMIN")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
