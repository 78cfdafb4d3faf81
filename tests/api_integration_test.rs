/// Integration tests for the HTTP API
///
/// Drives the axum router directly with tower's oneshot, covering the
/// /health, /protocols, and /predict endpoints against trained and
/// untrained models.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chrono::{TimeZone, Utc};
use protocol_advisor::api::{build_router, AppState};
use protocol_advisor::ml::{create_model, FeatureEncoder, Model};
use protocol_advisor::models::{IncidentCategory, IncidentRecord, Severity};
use protocol_advisor::protocols::ProtocolCatalog;
use serde_json::{json, Value};
use tower::ServiceExt;

fn sample_record(
    severity: Severity,
    category: IncidentCategory,
    hour: u32,
    description: &str,
) -> IncidentRecord {
    IncidentRecord::new(
        severity,
        Utc.with_ymd_and_hms(2024, 1, 15, hour, 30, 0).unwrap(),
        45.4642 + hour as f64 * 0.001,
        9.19 + hour as f64 * 0.001,
        description.to_string(),
        category,
    )
}

/// Training set mapping each category onto one catalog protocol
fn training_data() -> (Vec<IncidentRecord>, Vec<i32>) {
    let cases = [
        (
            IncidentCategory::RearEndCollision,
            "multiple vehicle pileup on the highway",
            1,
        ),
        (
            IncidentCategory::ObstacleCollision,
            "vehicle against the guard rail",
            0,
        ),
        (
            IncidentCategory::PedestrianStruck,
            "pedestrian injured on an urban road",
            2,
        ),
        (
            IncidentCategory::VehicleFire,
            "vehicle fire with heavy smoke",
            3,
        ),
    ];

    let mut records = Vec::new();
    let mut labels = Vec::new();
    for i in 0..40 {
        let (category, description, label) = cases[i % cases.len()];
        let severity = match i % 3 {
            0 => Severity::Low,
            1 => Severity::Medium,
            _ => Severity::High,
        };
        records.push(sample_record(
            severity,
            category,
            (6 + i as u32) % 24,
            description,
        ));
        labels.push(label);
    }
    (records, labels)
}

fn trained_state() -> AppState {
    let (records, labels) = training_data();
    let encoder = FeatureEncoder::new();

    let mut model = create_model("decision_tree").unwrap();
    model.train(&encoder.encode_batch(&records), &labels).unwrap();

    AppState::new(model)
}

fn untrained_state() -> AppState {
    AppState::new(create_model("decision_tree").unwrap())
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_predict(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let app = build_router(trained_state());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "DecisionTree");
    assert_eq!(body["trained"], true);
}

#[tokio::test]
async fn test_health_on_untrained_model() {
    let app = build_router(untrained_state());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["trained"], false);
}

#[tokio::test]
async fn test_protocols_lists_full_catalog() {
    let app = build_router(untrained_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protocols")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let protocols = body["protocols"].as_array().unwrap();
    assert_eq!(protocols.len(), ProtocolCatalog::new().len());
    assert!(protocols.iter().any(|p| p["code"] == "fire_suppression"));
}

#[tokio::test]
async fn test_predict_returns_catalog_protocol() {
    let app = build_router(trained_state());

    let body = json!({
        "severity": "high",
        "occurred_at": "2024-01-19T21:30:00Z",
        "latitude": 45.471,
        "longitude": 9.192,
        "description": "vehicle fire with heavy smoke",
        "category": "vehicle_fire",
    });

    let response = app.oneshot(post_predict(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let label = body["label"].as_i64().unwrap() as i32;
    let catalog = ProtocolCatalog::new();
    let protocol = catalog.get(label).expect("label must be in the catalog");
    assert_eq!(body["protocol"]["code"], protocol.code);
    assert_eq!(body["model"], "DecisionTree");
    assert!(body["prediction_id"].as_str().is_some());
}

#[tokio::test]
async fn test_predict_on_untrained_model_is_unavailable() {
    let app = build_router(untrained_state());

    let body = json!({
        "severity": "low",
        "occurred_at": "2024-01-15T14:20:00Z",
        "latitude": 45.47,
        "longitude": 9.185,
        "description": "vehicle against the guard rail",
        "category": "obstacle_collision",
    });

    let response = app.oneshot(post_predict(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "MODEL_NOT_TRAINED");
}

#[tokio::test]
async fn test_predict_rejects_unknown_category() {
    let app = build_router(trained_state());

    let body = json!({
        "severity": "high",
        "occurred_at": "2024-01-15T08:30:00Z",
        "latitude": 45.4642,
        "longitude": 9.19,
        "description": "unclassifiable incident",
        "category": "invalid_category",
    });

    let response = app.oneshot(post_predict(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_rejects_out_of_range_coordinates() {
    let app = build_router(trained_state());

    let body = json!({
        "severity": "high",
        "occurred_at": "2024-01-15T08:30:00Z",
        "latitude": 123.0,
        "longitude": 9.19,
        "description": "coordinates out of range",
        "category": "rear_end_collision",
    });

    let response = app.oneshot(post_predict(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
