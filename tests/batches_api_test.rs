//! Integration tests for batches and the production workflow.
//!
//! Run with: cargo test --test batches_api_test

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use sea_orm::{ConnectionTrait, DbBackend, Statement};

use common::{
    assert_close, batch_id, create_settings, get, post, post_json, send, setup_test_app,
    start_production,
};

fn messages(batch: &Value) -> Vec<String> {
    batch["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["message"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn start_production_opens_seeded_batch() {
    let app = setup_test_app().await;

    let batch = start_production(&app.router).await;
    let number = batch["batch_number"].as_str().unwrap();

    assert!(number.starts_with('B'));
    assert_eq!(batch["is_active"], true);
    assert!(batch["end_time"].is_null());
    assert_eq!(batch["total_count"], 0);
    assert_eq!(batch["defect_count"], 0);
    assert_close(&batch["defect_percentage"], 0.0);

    let parameters = batch["parameters"].as_array().unwrap();
    assert_eq!(parameters.len(), 1);
    assert_close(&parameters[0]["temperature"], 170.0);
    assert_close(&parameters[0]["pressure"], 2.5);
    assert_close(&parameters[0]["mixing_speed"], 60.0);
    assert_close(&parameters[0]["glazing_thickness"], 2.0);
    assert_eq!(parameters[0]["is_defect"], false);

    assert!(messages(&batch).contains(&format!("Batch {number} started")));
    assert_eq!(batch["notifications"][0]["notification_type"], "success");
    assert!(batch["vision_data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn starting_again_closes_the_running_batch() {
    let app = setup_test_app().await;

    let first = start_production(&app.router).await;
    let second = start_production(&app.router).await;
    assert_ne!(first["batch_number"], second["batch_number"]);

    let (status, first_now) = get(&app.router, &format!("/api/batches/{}", batch_id(&first))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first_now["is_active"], false);
    assert!(!first_now["end_time"].is_null());
    let number = first["batch_number"].as_str().unwrap();
    assert!(messages(&first_now).contains(&format!("Batch {number} completed")));

    let (status, active) = get(&app.router, "/api/batches?is_active=true").await;
    assert_eq!(status, StatusCode::OK);
    let active = active.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second["id"]);
}

#[tokio::test]
async fn stopping_twice_is_a_conflict() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);

    let (status, stopped) = post(&app.router, &format!("/api/batches/{id}/stop_production")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stopped["is_active"], false);
    assert!(!stopped["end_time"].is_null());
    let number = batch["batch_number"].as_str().unwrap();
    assert!(messages(&stopped).contains(&format!("Batch {number} stopped")));

    let (status, body) = post(&app.router, &format!("/api/batches/{id}/stop_production")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already stopped"));

    let (_, after) = get(&app.router, &format!("/api/batches/{id}")).await;
    assert_eq!(after["end_time"], stopped["end_time"]);
    assert_eq!(
        after["notifications"].as_array().unwrap().len(),
        stopped["notifications"].as_array().unwrap().len()
    );
}

#[tokio::test]
async fn simulating_an_inactive_batch_writes_nothing() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);
    post(&app.router, &format!("/api/batches/{id}/stop_production")).await;

    let (status, _) = post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, after) = get(&app.router, &format!("/api/batches/{id}")).await;
    assert_eq!(after["parameters"].as_array().unwrap().len(), 1);
    assert_eq!(after["total_count"], 0);
}

#[tokio::test]
async fn simulation_drifts_from_latest_reading() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);

    app.source.push_uniforms(&[0.2, 0.02, -0.2, -0.01]);
    let (status, reading) = post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reading["batch_id"], batch["id"]);
    assert_close(&reading["temperature"], 170.2);
    assert_close(&reading["pressure"], 2.52);
    assert_close(&reading["mixing_speed"], 59.8);
    assert_close(&reading["glazing_thickness"], 1.99);
    assert_eq!(reading["is_defect"], false);

    // Second step starts from the first simulated reading
    app.source.push_uniforms(&[-0.1, -0.01, 0.2, 0.02]);
    let (_, reading) = post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;
    assert_close(&reading["temperature"], 170.1);
    assert_close(&reading["pressure"], 2.51);
    assert_close(&reading["mixing_speed"], 60.0);
    assert_close(&reading["glazing_thickness"], 2.01);

    let (_, after) = get(&app.router, &format!("/api/batches/{id}")).await;
    assert_eq!(after["total_count"], 2);
    assert_eq!(after["defect_count"], 0);
    assert_eq!(after["parameters"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn defective_readings_are_counted_and_reported() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);

    // Alternate out of range and back for the first six steps
    let temperature_steps = [15.0, -15.0, 15.0, -15.0, 15.0, -15.0, 0.0, 0.0, 0.0, 0.0];
    for step in temperature_steps {
        app.source.push_uniforms(&[step, 0.0, 0.0, 0.0]);
        let (status, _) =
            post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, after) = get(&app.router, &format!("/api/batches/{id}")).await;
    assert_eq!(after["total_count"], 10);
    assert_eq!(after["defect_count"], 3);
    assert_close(&after["defect_percentage"], 30.0);

    let number = batch["batch_number"].as_str().unwrap();
    let warnings: Vec<&Value> = after["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["notification_type"] == "warning")
        .collect();
    assert_eq!(warnings.len(), 3);
    assert_eq!(
        warnings[0]["message"],
        format!("Defect detected in batch {number}")
    );

    let (_, defective) = get(
        &app.router,
        &format!("/api/parameters?batch_id={id}&is_defect=true"),
    )
    .await;
    assert_eq!(defective.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_returns_summaries_only() {
    let app = setup_test_app().await;
    start_production(&app.router).await;

    let (status, body) = get(&app.router, "/api/batches").await;
    assert_eq!(status, StatusCode::OK);

    let item = &body.as_array().unwrap()[0];
    assert!(item.get("defect_percentage").is_some());
    assert!(item.get("parameters").is_none());
    assert!(item.get("notifications").is_none());
    assert!(item.get("vision_data").is_none());
}

#[tokio::test]
async fn unknown_batch_is_not_found() {
    let app = setup_test_app().await;
    let id = Uuid::new_v4();

    let (status, body) = get(&app.router, &format!("/api/batches/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = post(&app.router, &format!("/api/batches/{id}/stop_production")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app.router, "DELETE", &format!("/api/batches/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn second_active_batch_is_rejected() {
    let app = setup_test_app().await;
    start_production(&app.router).await;

    let (status, _) = post_json(
        &app.router,
        "/api/batches",
        json!({ "batch_number": "MANUAL-1", "is_active": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, created) =
        post_json(&app.router, "/api/batches", json!({ "batch_number": "MANUAL-1" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_active"], false);

    let (status, _) =
        post_json(&app.router, "/api/batches", json!({ "batch_number": "MANUAL-1" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_counters_are_rejected() {
    let app = setup_test_app().await;

    let (status, _) = post_json(
        &app.router,
        "/api/batches",
        json!({ "defect_count": 5, "total_count": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_batch_removes_its_children() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);
    post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;

    let (status, _) = send(&app.router, "DELETE", &format!("/api/batches/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, parameters) = get(&app.router, &format!("/api/parameters?batch_id={id}")).await;
    assert!(parameters.as_array().unwrap().is_empty());

    let (_, notifications) = get(&app.router, &format!("/api/notifications?batch_id={id}")).await;
    assert!(notifications.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn closing_through_update_sets_end_time() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);

    let (status, updated) = send(
        &app.router,
        "PATCH",
        &format!("/api/batches/{id}"),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_active"], false);
    assert!(!updated["end_time"].is_null());
}

async fn delete_seed_reading(app: &common::TestApp, batch: &Value) {
    let parameter_id = batch["parameters"][0]["id"].as_str().unwrap();
    let (status, _) = send(
        &app.router,
        "DELETE",
        &format!("/api/parameters/{parameter_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn simulating_without_readings_starts_from_defaults() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);
    delete_seed_reading(&app, &batch).await;

    // No jitter may be drawn for the first reading
    app.source.push_uniforms(&[0.2, 0.02, 0.2, 0.02]);
    let (status, reading) = post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;
    assert_eq!(status, StatusCode::OK);
    assert_close(&reading["temperature"], 170.0);
    assert_close(&reading["pressure"], 2.5);
    assert_close(&reading["mixing_speed"], 60.0);
    assert_close(&reading["glazing_thickness"], 2.0);
    assert_eq!(reading["is_defect"], false);

    let (_, after) = get(&app.router, &format!("/api/batches/{id}")).await;
    assert_eq!(after["total_count"], 1);
    assert_eq!(after["defect_count"], 0);

    // The queued jitter is consumed by the next step instead
    let (_, reading) = post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;
    assert_close(&reading["temperature"], 170.2);
}

#[tokio::test]
async fn simulating_without_readings_starts_from_active_settings() {
    let app = setup_test_app().await;
    let settings_id = create_settings(&app.router, "Recipe A", [165.0, 2.2, 58.0, 2.1]).await;
    post(&app.router, &format!("/api/settings/{settings_id}/activate")).await;

    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);
    delete_seed_reading(&app, &batch).await;

    app.source.push_uniforms(&[0.2, 0.02, 0.2, 0.02]);
    let (status, reading) = post(&app.router, &format!("/api/batches/{id}/simulate_parameter")).await;
    assert_eq!(status, StatusCode::OK);
    assert_close(&reading["temperature"], 165.0);
    assert_close(&reading["pressure"], 2.2);
    assert_close(&reading["mixing_speed"], 58.0);
    assert_close(&reading["glazing_thickness"], 2.1);

    let (_, after) = get(&app.router, &format!("/api/batches/{id}")).await;
    assert_eq!(after["total_count"], 1);
}

#[tokio::test]
async fn reopening_through_update_clears_end_time() {
    let app = setup_test_app().await;
    let batch = start_production(&app.router).await;
    let id = batch_id(&batch);
    post(&app.router, &format!("/api/batches/{id}/stop_production")).await;

    let (status, reopened) = send(
        &app.router,
        "PATCH",
        &format!("/api/batches/{id}"),
        Some(json!({ "is_active": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reopened["is_active"], true);
    assert!(reopened["end_time"].is_null());
}

#[tokio::test]
async fn schema_defaults_batches_to_inactive() {
    let app = setup_test_app().await;

    app.db
        .execute_unprepared(
            "INSERT INTO batches (id, batch_number, start_time) \
             VALUES (randomblob(16), 'RAW-1', '2026-10-16 08:00:00+00:00')",
        )
        .await
        .unwrap();

    let row = app
        .db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT is_active, total_count FROM batches WHERE batch_number = 'RAW-1'",
        ))
        .await
        .unwrap()
        .unwrap();

    assert!(!row.try_get::<bool>("", "is_active").unwrap());
    assert_eq!(row.try_get::<i32>("", "total_count").unwrap(), 0);
}
