//! Integration tests for the prediction server endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use predict_server::api::{create_router, AppState};
use predictor_lib::{
    health::{components, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
    pipeline::{Classifier, FeatureTransform, InferencePipeline, PipelineTransform},
    PreprocessedFeatures,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SPEC: &str = r#"{
    "version": "v1.2.0",
    "steps": [
        { "op": "kelvin_to_celsius",
          "columns": ["Air temperature [K]", "Process temperature [K]"] },
        { "op": "ordinal_encode", "column": "Type" },
        { "op": "standard_scale",
          "columns": ["Air temperature [K]", "Process temperature [K]",
                      "Rotational speed [rpm]", "Torque [Nm]", "Tool wear [min]"],
          "means": [26.86, 36.86, 1538.78, 39.99, 107.95],
          "scales": [2.0, 1.48, 179.87, 9.97, 63.65] }
    ],
    "output_columns": [
        "Air temperature [K]", "Process temperature [K]",
        "Rotational speed [rpm]", "Torque [Nm]", "Tool wear [min]", "Type"
    ]
}"#;

struct StubClassifier {
    code: i64,
    calls: AtomicUsize,
}

impl StubClassifier {
    fn new(code: i64) -> Arc<Self> {
        Arc::new(Self {
            code,
            calls: AtomicUsize::new(0),
        })
    }
}

impl Classifier for StubClassifier {
    fn predict(&self, _features: &PreprocessedFeatures) -> predictor_lib::Result<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.code)
    }
}

async fn setup_test_app(
    binary_code: i64,
    multiclass_code: i64,
) -> (Router, Arc<AppState>, Arc<StubClassifier>, Arc<StubClassifier>) {
    let transform: Arc<dyn FeatureTransform> =
        Arc::new(PipelineTransform::from_json(TEST_SPEC).unwrap());
    let binary = StubClassifier::new(binary_code);
    let multiclass = StubClassifier::new(multiclass_code);
    let pipeline = InferencePipeline::new(transform, binary.clone(), multiclass.clone());

    let health_registry = HealthRegistry::new();
    health_registry.register(components::ARTIFACTS).await;
    health_registry.register(components::PIPELINE).await;
    health_registry.register(components::HTTP_API).await;

    let state = Arc::new(AppState::new(
        pipeline,
        health_registry,
        ServiceMetrics::new(),
        StructuredLogger::new("predict-server-test"),
    ));
    let router = create_router(state.clone());

    (router, state, binary, multiclass)
}

fn sensor_payload() -> Value {
    json!({
        "air_temperature_K": 298.7,
        "process_temperature_K": 305.1,
        "rotational_speed_rpm": 1500,
        "torque_Nm": 40.3,
        "tool_wear_min": 150,
        "type": "L"
    })
}

async fn post_predict(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_predict_healthy_reading_returns_no_failure() {
    let (app, _state, binary, multiclass) = setup_test_app(0, 4).await;

    let (status, body) = post_predict(app, "/predict", sensor_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "prediction": "No Failure" }));
    assert_eq!(binary.calls.load(Ordering::SeqCst), 1);
    assert_eq!(multiclass.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_predict_failing_reading_reports_failure_type() {
    let (app, _state, binary, multiclass) = setup_test_app(1, 4).await;

    let (status, body) = post_predict(app, "/predict", sensor_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "prediction": "Failure Detected",
            "failure_type": "Tool Wear"
        })
    );
    assert_eq!(binary.calls.load(Ordering::SeqCst), 1);
    assert_eq!(multiclass.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_predict_accepts_trailing_slash() {
    let (app, _state, _binary, _multiclass) = setup_test_app(0, 4).await;

    let (status, body) = post_predict(app, "/predict/", sensor_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "prediction": "No Failure" }));
}

#[tokio::test]
async fn test_predict_unknown_failure_code_maps_to_sentinel() {
    let (app, _state, _binary, _multiclass) = setup_test_app(1, 9).await;

    let (status, body) = post_predict(app, "/predict", sensor_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["failure_type"], "Unknown Failure Type");
}

#[tokio::test]
async fn test_predict_rejects_unknown_quality_grade() {
    let (app, _state, binary, multiclass) = setup_test_app(0, 4).await;

    let mut payload = sensor_payload();
    payload["type"] = json!("X");
    let (status, body) = post_predict(app, "/predict", payload.to_string()).await;

    // Errors still come back as 200 with a JSON error body
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
    assert_eq!(binary.calls.load(Ordering::SeqCst), 0);
    assert_eq!(multiclass.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_predict_rejects_non_integer_speed() {
    let (app, _state, binary, _multiclass) = setup_test_app(0, 4).await;

    let mut payload = sensor_payload();
    payload["rotational_speed_rpm"] = json!("fast");
    let (status, body) = post_predict(app, "/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
    assert_eq!(binary.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_predict_rejects_missing_field() {
    let (app, _state, binary, _multiclass) = setup_test_app(0, 4).await;

    let mut payload = sensor_payload();
    payload.as_object_mut().unwrap().remove("tool_wear_min");
    let (status, body) = post_predict(app, "/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("tool_wear_min"));
    assert_eq!(binary.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_predict_rejects_malformed_json_body() {
    let (app, _state, binary, _multiclass) = setup_test_app(0, 4).await;

    let (status, body) = post_predict(app, "/predict", "{ not json".to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
    assert_eq!(binary.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state, _binary, _multiclass) = setup_test_app(0, 4).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["artifacts"].is_object());
    assert!(health["components"]["pipeline"].is_object());
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state, _binary, _multiclass) = setup_test_app(0, 4).await;

    state
        .health_registry
        .set_unhealthy(components::PIPELINE, "Model plan unusable")
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_readyz_follows_readiness() {
    let (app, state, _binary, _multiclass) = setup_test_app(0, 4).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    state.health_registry.set_ready(true).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let (app, _state, _binary, _multiclass) = setup_test_app(0, 4).await;

    // Serve one prediction so the counters move
    let (status, _body) = post_predict(
        app.clone(),
        "/predict",
        sensor_payload().to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("predict_server_request_latency_seconds"));
    assert!(metrics_text.contains("predict_server_predictions_no_failure_total"));
    assert!(metrics_text.contains("predict_server_request_errors_total"));
}
