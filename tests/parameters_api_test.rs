//! Integration tests for process readings.
//!
//! Run with: cargo test --test parameters_api_test

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{assert_close, batch_id, get, post, post_json, send, setup_test_app, start_production};

#[tokio::test]
async fn current_parameters_requires_running_batch() {
    let app = setup_test_app().await;

    let (status, body) = get(&app.router, "/api/parameters/current_parameters").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No active batch");
}

#[tokio::test]
async fn current_parameters_requires_a_reading() {
    let app = setup_test_app().await;
    post_json(&app.router, "/api/batches", json!({ "is_active": true })).await;

    let (status, body) = get(&app.router, "/api/parameters/current_parameters").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No parameters for the active batch");
}

#[tokio::test]
async fn current_parameters_returns_latest_reading() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);

    app.source.push_uniforms(&[0.2, 0.0, 0.0, 0.0]);
    let (_, reading) = post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;

    let (status, current) = get(&app.router, "/api/parameters/current_parameters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["id"], reading["id"]);
    assert_close(&current["temperature"], 170.2);
}

#[tokio::test]
async fn manual_readings_are_classified_but_not_counted() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);

    let (status, created) = post_json(
        &app.router,
        "/api/parameters",
        json!({
            "batch_id": id,
            "temperature": 190.0,
            "pressure": 2.5,
            "mixing_speed": 60.0,
            "glazing_thickness": 2.0,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_defect"], true);

    let (_, after) = get(&app.router, &format!("/api/batches/{id}")).await;
    assert_eq!(after["total_count"], 0);
    assert_eq!(after["defect_count"], 0);

    // Correcting the value clears the defect flag
    let parameter_id = created["id"].as_str().unwrap();
    let (status, updated) = send(
        &app.router,
        "PATCH",
        &format!("/api/parameters/{parameter_id}"),
        Some(json!({ "temperature": 172.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_defect"], false);
    assert_close(&updated["pressure"], 2.5);
}

#[tokio::test]
async fn reading_for_unknown_batch_is_rejected() {
    let app = setup_test_app().await;

    let (status, _) = post_json(
        &app.router,
        "/api/parameters",
        json!({
            "batch_id": uuid::Uuid::new_v4(),
            "temperature": 170.0,
            "pressure": 2.5,
            "mixing_speed": 60.0,
            "glazing_thickness": 2.0,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_reading() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let parameter_id = batch["parameters"][0]["id"].as_str().unwrap();

    let uri = format!("/api/parameters/{parameter_id}");
    let (status, _) = send(&app.router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
