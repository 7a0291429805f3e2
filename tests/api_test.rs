//! End-to-end tests for the REST API.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use restaurant_scheduling::api;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_schedule(body: Value) -> (StatusCode, Value) {
    let app = api::router();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/schedule")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn minimal_request() -> Value {
    json!({
        "staffList": [
            {
                "id": "alice",
                "name": "Alice",
                "rolesInPreferenceOrder": ["Server"],
                "maxHoursPerWeek": 40
            }
        ],
        "unavailabilityList": [],
        "weeklyNeeds": {
            "Monday": {"HALF_DAY_AM": {"Server": 1}}
        },
        "shiftDefinitions": {
            "HALF_DAY_AM": {"start": "11:00", "end": "16:00", "hours": 5.0}
        }
    })
}

#[tokio::test]
async fn test_health() {
    let app = api::router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], "UP");
}

#[tokio::test]
async fn test_schedule_success() {
    let (status, body) = post_schedule(minimal_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["schedule"]["Monday"]["HALF_DAY_AM"]["Server"][0],
        "alice"
    );
    assert_eq!(body["warnings"], json!([]));
    assert!(body["calculationTimeMs"].is_u64());
}

#[tokio::test]
async fn test_schedule_reports_shortage() {
    let mut request = minimal_request();
    request["weeklyNeeds"]["Monday"]["HALF_DAY_AM"]["Server"] = json!(3);

    let (status, body) = post_schedule(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let warnings = body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    let text = warnings[0].as_str().unwrap();
    assert!(text.contains("Monday") && text.contains("Server") && text.contains('2'));
}

#[tokio::test]
async fn test_schedule_validation_failure() {
    let mut request = minimal_request();
    request["shiftDefinitions"]["HALF_DAY_AM"]["start"] = json!("25:99");

    let (status, body) = post_schedule(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("25:99"));
}

#[tokio::test]
async fn test_schedule_infeasible() {
    let mut request = minimal_request();
    request["staffList"][0]["maxHoursPerWeek"] = json!(0);

    let (status, body) = post_schedule(request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("hard constraints"));
}

#[tokio::test]
async fn test_demo_data_round_trip() {
    let app = api::router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/demo-data/SMALL")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let demo: Value = serde_json::from_slice(&bytes).unwrap();

    let (status, body) = post_schedule(demo).await;
    assert_eq!(status, StatusCode::OK, "demo data must solve: {body}");
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_unknown_demo_data() {
    let app = api::router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/demo-data/HUGE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
