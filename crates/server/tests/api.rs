//! API integration tests.
//!
//! These tests drive the router in-process with mock collaborators injected,
//! so no network, display surface, or real work transport is needed.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use bellhop_core::{
    testing::{MockConstraintProbe, MockDisplay, MockPresenter, MockWorkBody},
    Config, NotifierSpec, OrchestratorConfig, PipelineOrchestrator, WorkItemExecutor,
};
use bellhop_server::api::create_router;
use bellhop_server::state::AppState;

fn fast_spec(channel_id: &str, countdown_start: u32, notification_id: u32) -> NotifierSpec {
    NotifierSpec {
        channel_id: channel_id.to_string(),
        channel_name: format!("{} Channel", channel_id),
        display_title: "worker process is done".to_string(),
        initial_body: "Check it out!".to_string(),
        subtitle_template: "{remaining} seconds left".to_string(),
        countdown_start,
        tick: Duration::from_millis(5),
        notification_id,
        tap_target: "bellhop://home".to_string(),
    }
}

/// Test fixture with an in-process router and mock dependencies.
struct TestFixture {
    router: Router,
}

impl TestFixture {
    fn new() -> Self {
        let executor = Arc::new(WorkItemExecutor::new(
            Arc::new(MockWorkBody::new()),
            Arc::new(MockConstraintProbe::new()),
            Duration::from_millis(10),
        ));
        let orchestrator_config = OrchestratorConfig {
            first_notifier: fast_spec("001", 10, 0xCA7),
            second_notifier: fast_spec("002", 5, 0xCA8),
        };
        let orchestrator = PipelineOrchestrator::new(
            orchestrator_config,
            executor,
            Arc::new(MockPresenter::new()),
            Arc::new(MockDisplay::new()),
        );

        let state = Arc::new(AppState::new(Config::default(), orchestrator));
        Self {
            router: create_router(state),
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        parse_json(response).await
    }

    async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        parse_json(response).await
    }
}

async fn parse_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();

    let (status, body) = fixture.get("/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_get_config() {
    let fixture = TestFixture::new();

    let (status, body) = fixture.get("/api/v1/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server"]["port"], 8080);
}

#[tokio::test]
async fn test_submit_pipeline() {
    let fixture = TestFixture::new();

    let (status, body) = fixture
        .post("/api/v1/pipelines", json!({ "correlation_id": "001" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["correlation_id"], "001");

    let chain_id = body["chain_id"].as_str().unwrap().to_string();
    let (status, body) = fixture
        .get(&format!("/api/v1/pipelines/{}", chain_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_submit_pipeline_empty_correlation_id() {
    let fixture = TestFixture::new();

    let (status, body) = fixture
        .post("/api/v1/pipelines", json!({ "correlation_id": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("configuration error"));
}

#[tokio::test]
async fn test_list_pipelines() {
    let fixture = TestFixture::new();

    let (_, _) = fixture
        .post("/api/v1/pipelines", json!({ "correlation_id": "001" }))
        .await;

    let (status, body) = fixture.get("/api/v1/pipelines").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_unknown_pipeline() {
    let fixture = TestFixture::new();

    let (status, body) = fixture.get("/api/v1/pipelines/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_list_notifiers_initially_empty() {
    let fixture = TestFixture::new();

    let (status, body) = fixture.get("/api/v1/notifiers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();

    let (status, _text) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
}
