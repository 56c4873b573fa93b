//! Integration tests for the computer vision stub.
//!
//! Run with: cargo test --test vision_api_test

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{assert_close, batch_id, get, post, post_json, send, setup_test_app, start_production};

#[tokio::test]
async fn process_frame_without_batch_stores_nothing() {
    let app = setup_test_app().await;

    let (status, body) = post(&app.router, "/api/computer-vision/process_frame").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No active batch"));

    let (_, records) = get(&app.router, "/api/computer-vision").await;
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn process_frame_records_detection() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;

    app.source.push_uniforms(&[0.85]);
    app.source.push_flips(&[true]);

    let (status, record) = post(&app.router, "/api/computer-vision/process_frame").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["batch_id"], batch["id"]);
    assert_close(&record["confidence_score"], 0.85);
    assert_eq!(record["is_defect"], true);
    assert_eq!(
        record["detected_objects"],
        json!({ "objects": ["protein_bar"], "boxes": [[100, 100, 200, 200]] })
    );

    let (_, detail) = get(&app.router, &format!("/api/batches/{}", batch_id(&batch))).await;
    assert_eq!(detail["vision_data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn camera_start_requires_running_batch() {
    let app = setup_test_app().await;

    let (status, _) = post(&app.router, "/api/computer-vision/start_camera").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    start_production(&app.router).await;
    let (status, body) = post(&app.router, "/api/computer-vision/start_camera").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Camera started");
}

#[tokio::test]
async fn camera_stop_always_succeeds() {
    let app = setup_test_app().await;

    let (status, body) = post(&app.router, "/api/computer-vision/stop_camera").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Camera stopped");
}

#[tokio::test]
async fn list_filters_by_batch() {
    let app = setup_test_app().await;
    let first = start_production(&app.router).await;
    post(&app.router, "/api/computer-vision/process_frame").await;
    let second = start_production(&app.router).await;
    post(&app.router, "/api/computer-vision/process_frame").await;
    post(&app.router, "/api/computer-vision/process_frame").await;

    let (_, for_first) = get(
        &app.router,
        &format!("/api/computer-vision?batch_id={}", batch_id(&first)),
    )
    .await;
    assert_eq!(for_first.as_array().unwrap().len(), 1);

    let (_, for_second) = get(
        &app.router,
        &format!("/api/computer-vision?batch_id={}", batch_id(&second)),
    )
    .await;
    assert_eq!(for_second.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn confidence_must_be_a_probability() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;

    let (status, _) = post_json(
        &app.router,
        "/api/computer-vision",
        json!({
            "batch_id": batch["id"],
            "detected_objects": { "objects": [] },
            "confidence_score": 1.5,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = post_json(
        &app.router,
        "/api/computer-vision",
        json!({
            "batch_id": batch["id"],
            "detected_objects": { "objects": [] },
            "confidence_score": 0.5,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_defect"], false);

    let uri = format!("/api/computer-vision/{}", created["id"].as_str().unwrap());
    let (status, _) = send(&app.router, "PUT", &uri, Some(json!({ "confidence_score": -0.1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
