//! Health and documentation endpoints.
//!
//! Run with: cargo test --test health_api_test

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use common::setup_test_app;

#[tokio::test]
async fn healthz_reports_ok_with_database() {
    let app = setup_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn docs_are_served() {
    let app = setup_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn openapi_lists_production_routes() {
    let doc = protein_line::routes::openapi();
    let paths = &doc.paths.paths;

    for path in [
        "/api/batches/start_production",
        "/api/batches/{batch_id}/stop_production",
        "/api/batches/{batch_id}/simulate_parameter",
        "/api/parameters/current_parameters",
        "/api/settings/{settings_id}/activate",
        "/api/notifications/mark_all_read",
        "/api/computer-vision/process_frame",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}
