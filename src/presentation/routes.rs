// Router - routes, compression and request tracing
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    ask_assistant, assistant_intro, get_alerts, get_dashboard, get_series, health_check,
    list_entities, stream_dashboard,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::compression::predicate::{DefaultPredicate, NotForContentType, Predicate};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    // Progressive dashboards must reach the client chunk by chunk
    let compression = CompressionLayer::new().compress_when(
        DefaultPredicate::new().and(NotForContentType::const_new("application/x-ndjson")),
    );

    Router::new()
        .route("/healthz", get(health_check))
        .route("/domains/:domain/entities", get(list_entities))
        .route("/domains/:domain/entities/:id/series", get(get_series))
        .route("/domains/:domain/entities/:id/alerts", get(get_alerts))
        .route("/domains/:domain/dashboards/:id", get(get_dashboard))
        .route("/domains/:domain/dashboards/:id/stream", get(stream_dashboard))
        .route(
            "/domains/:domain/assistant",
            get(assistant_intro).post(ask_assistant),
        )
        .layer(compression)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Domain;
    use crate::domain::metric::MetricKey;
    use crate::infrastructure::config::{ChartConfig, SentinelConfig, WidgetsConfig};
    use crate::infrastructure::static_registry::StaticRegistry;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let mut config = SentinelConfig::default();
        config.assistant.delay_ms = 0;
        let widgets = WidgetsConfig {
            charts: vec![ChartConfig {
                id: "agro-vpd".to_string(),
                domain: Domain::Agriculture,
                metric: MetricKey::Vpd,
                title: "VPD".to_string(),
                color: "#a855f7".to_string(),
                unit: Some("kPa".to_string()),
            }],
        };
        let state = AppState::new(Arc::new(StaticRegistry::new()), &config, widgets).unwrap();
        router(Arc::new(state))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_entities() {
        let (status, body) = get_json("/domains/agro/entities").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);
        assert_eq!(body[0]["id"], "GH-AMB-01");
        assert!(body[0].get("keywords").is_none());
    }

    #[tokio::test]
    async fn test_unknown_domain_is_json_404() {
        let (status, body) = get_json("/domains/weather/entities").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_series_windows() {
        let (status, body) = get_json(
            "/domains/industry/entities/MACH-02/series?window=history&days=2&readings_per_day=24",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["samples"].as_array().unwrap().len(), 48);
        assert_eq!(body["entity"]["id"], "MACH-02");

        let (status, body) = get_json("/domains/ehs/entities/DOES-NOT-EXIST/series").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["samples"].as_array().unwrap().len(), 24);
        assert_eq!(body["entity"]["id"], "WRK-001");
    }

    #[tokio::test]
    async fn test_bad_query_is_json_400() {
        let (status, body) =
            get_json("/domains/agro/entities/GH-AMB-01/series?window=weekly").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (status, _) =
            get_json("/domains/agro/entities/GH-AMB-01/series?window=history&days=9999").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_alerts() {
        let (status, body) =
            get_json("/domains/agro/entities/GH-DUR-01/alerts?window=history&days=30").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["recent"].as_array().unwrap().len() <= 10);
        assert!(body["counts"].is_array());
    }

    #[tokio::test]
    async fn test_dashboard() {
        let (status, body) = get_json("/domains/agriculture/dashboards/GH-CAY-01?mode=live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["samples"], 24);
        assert_eq!(body["charts"][0]["id"], "agro-vpd");
        assert_eq!(body["map"]["sites"].as_array().unwrap().len(), 5);

        let (status, body) = get_json(
            "/domains/agriculture/dashboards/GH-CAY-01?mode=history&start=2020-01-01&end=bad",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["samples"], 0);
    }

    #[tokio::test]
    async fn test_dashboard_stream() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/domains/agro/dashboards/GH-AMB-01/stream")
                    .header(header::ACCEPT_ENCODING, "gzip")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let types: Vec<String> = String::from_utf8(body.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap()["type"].to_string())
            .collect();
        assert_eq!(
            types,
            vec!["\"skeleton\"", "\"chart_update\"", "\"alerts\"", "\"complete\""]
        );
    }

    #[tokio::test]
    async fn test_assistant_turn() {
        let (status, body) = get_json("/domains/personal/assistant").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["greeting"]["role"], "assistant");

        let request = Request::builder()
            .method("POST")
            .uri("/domains/agro/assistant")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"query": "xyz123", "entity_id": "GH-AMB-01"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let turn: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(turn["question"]["role"], "user");
        assert_eq!(turn["question"]["text"], "xyz123");
        assert_eq!(turn["reply"]["text"], Domain::Agriculture.profile().vocabulary.help);
        assert_eq!(turn["reply"]["is_error"], false);

        let request = Request::builder()
            .method("POST")
            .uri("/domains/agro/assistant")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"query": "  "}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
