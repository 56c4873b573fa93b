pub mod batches;
pub mod health;
pub mod notifications;
pub mod parameters;
pub mod settings;
pub mod vision;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::{AppState, StatusResponse};
use crate::entity::notifications::NotificationType;
use crate::services::rate_limit::ClientIpKeyExtractor;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        batches::list_batches,
        batches::get_batch,
        batches::create_batch,
        batches::update_batch,
        batches::delete_batch,
        batches::start_production,
        batches::stop_production,
        batches::simulate_parameter,
        parameters::list_parameters,
        parameters::current_parameters,
        parameters::get_parameter,
        parameters::create_parameter,
        parameters::update_parameter,
        parameters::delete_parameter,
        settings::list_settings,
        settings::active_settings,
        settings::get_settings,
        settings::create_settings,
        settings::update_settings,
        settings::delete_settings,
        settings::activate_settings,
        notifications::list_notifications,
        notifications::get_notification,
        notifications::create_notification,
        notifications::update_notification,
        notifications::delete_notification,
        notifications::mark_all_read,
        vision::list_vision_data,
        vision::get_vision_data,
        vision::create_vision_data,
        vision::update_vision_data,
        vision::delete_vision_data,
        vision::start_camera,
        vision::stop_camera,
        vision::process_frame,
    ),
    components(
        schemas(
            batches::BatchSummary,
            batches::BatchDetailResponse,
            batches::CreateBatch,
            batches::UpdateBatch,
            parameters::ParameterResponse,
            parameters::CreateParameter,
            parameters::UpdateParameter,
            settings::SettingsResponse,
            settings::CreateSettings,
            settings::UpdateSettings,
            notifications::NotificationResponse,
            notifications::CreateNotification,
            notifications::UpdateNotification,
            vision::VisionDataResponse,
            vision::CreateVisionData,
            vision::UpdateVisionData,
            NotificationType,
            StatusResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "batches", description = "Production batches"),
        (name = "production", description = "Starting, stopping and simulating production"),
        (name = "parameters", description = "Process readings"),
        (name = "settings", description = "Production settings"),
        (name = "notifications", description = "Operator notifications"),
        (name = "computer-vision", description = "Camera defect detection (stub)"),
    ),
    info(
        title = "Protein Line API",
        description = "Management API for a simulated protein-bar production line",
        version = "0.1.0"
    )
)]
struct ApiDoc;

fn api_routes() -> Router<AppState> {
    Router::new()
        // Batches
        .route(
            "/batches",
            get(batches::list_batches).post(batches::create_batch),
        )
        .route("/batches/start_production", post(batches::start_production))
        .route(
            "/batches/{batch_id}",
            get(batches::get_batch)
                .put(batches::update_batch)
                .patch(batches::update_batch)
                .delete(batches::delete_batch),
        )
        .route(
            "/batches/{batch_id}/stop_production",
            post(batches::stop_production),
        )
        .route(
            "/batches/{batch_id}/simulate_parameter",
            post(batches::simulate_parameter),
        )
        // Parameters
        .route(
            "/parameters",
            get(parameters::list_parameters).post(parameters::create_parameter),
        )
        .route(
            "/parameters/current_parameters",
            get(parameters::current_parameters),
        )
        .route(
            "/parameters/{parameter_id}",
            get(parameters::get_parameter)
                .put(parameters::update_parameter)
                .patch(parameters::update_parameter)
                .delete(parameters::delete_parameter),
        )
        // Settings
        .route(
            "/settings",
            get(settings::list_settings).post(settings::create_settings),
        )
        .route("/settings/active", get(settings::active_settings))
        .route(
            "/settings/{settings_id}",
            get(settings::get_settings)
                .put(settings::update_settings)
                .patch(settings::update_settings)
                .delete(settings::delete_settings),
        )
        .route(
            "/settings/{settings_id}/activate",
            post(settings::activate_settings),
        )
        // Notifications
        .route(
            "/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route(
            "/notifications/mark_all_read",
            post(notifications::mark_all_read),
        )
        .route(
            "/notifications/{notification_id}",
            get(notifications::get_notification)
                .put(notifications::update_notification)
                .patch(notifications::update_notification)
                .delete(notifications::delete_notification),
        )
        // Computer vision
        .route(
            "/computer-vision",
            get(vision::list_vision_data).post(vision::create_vision_data),
        )
        .route("/computer-vision/start_camera", post(vision::start_camera))
        .route("/computer-vision/stop_camera", post(vision::stop_camera))
        .route("/computer-vision/process_frame", post(vision::process_frame))
        .route(
            "/computer-vision/{record_id}",
            get(vision::get_vision_data)
                .put(vision::update_vision_data)
                .patch(vision::update_vision_data)
                .delete(vision::delete_vision_data),
        )
}

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let api_routes = if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        api_routes()
    } else {
        tracing::info!(
            per_second = config.rate_limit_per_second,
            burst = config.rate_limit_burst,
            "Rate limiting configured"
        );

        let limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .expect("Failed to create rate limiter");

        api_routes().layer(GovernorLayer {
            config: Arc::new(limiter),
        })
    };
    let api_routes = api_routes.layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// OpenAPI document, for export and tests.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
