//! Shared helpers for the API integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations applied,
//! and a [`ScriptedSource`] so simulated values are exact.
#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use protein_line::common::AppState;
use protein_line::config::Config;
use protein_line::routes::build_router;
use protein_line::simulation::SimulationSource;

/// Source that replays queued values. An empty queue yields the midpoint of
/// the requested range and `false` for coin flips.
#[derive(Default)]
pub struct ScriptedSource {
    uniforms: Mutex<VecDeque<f64>>,
    flips: Mutex<VecDeque<bool>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_uniforms(&self, values: &[f64]) {
        self.uniforms.lock().unwrap().extend(values.iter().copied());
    }

    pub fn push_flips(&self, values: &[bool]) {
        self.flips.lock().unwrap().extend(values.iter().copied());
    }
}

impl SimulationSource for ScriptedSource {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        self.uniforms
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((low + high) / 2.0)
    }

    fn coin_flip(&self) -> bool {
        self.flips.lock().unwrap().pop_front().unwrap_or(false)
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub source: Arc<ScriptedSource>,
}

/// Fresh database, migrated, behind the full router.
pub async fn setup_test_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let source = Arc::new(ScriptedSource::new());
    let state = AppState::with_source(
        db.clone(),
        Config::for_tests("sqlite::memory:"),
        source.clone(),
    );

    TestApp {
        router: build_router(state),
        db,
        source,
    }
}

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({"error": "Invalid JSON response"}))
    };
    (status, body)
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    extract_response_body(response).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "POST", uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Start production and return the new batch body.
pub async fn start_production(app: &Router) -> Value {
    let (status, body) = post(app, "/api/batches/start_production").await;
    assert_eq!(status, StatusCode::CREATED, "start_production failed: {body}");
    body
}

pub fn batch_id(batch: &Value) -> String {
    batch["id"].as_str().unwrap().to_string()
}

/// Create an inactive settings row and return its id.
pub async fn create_settings(app: &Router, name: &str, values: [f64; 4]) -> String {
    let (status, body) = post_json(
        app,
        "/api/settings",
        json!({
            "name": name,
            "temperature": values[0],
            "pressure": values[1],
            "mixing_speed": values[2],
            "glazing_thickness": values[3],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create settings failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

pub fn assert_close(actual: &Value, expected: f64) {
    let actual = actual.as_f64().unwrap_or_else(|| panic!("not a number: {actual}"));
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
