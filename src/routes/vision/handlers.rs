use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::common::{AppState, StatusResponse};
use crate::entity::computer_vision_data;
use crate::error::{AppError, AppResult};
use crate::services::vision;

use super::types::{CreateVisionData, UpdateVisionData, VisionDataResponse, VisionQuery};

fn validate_confidence(confidence_score: f64) -> AppResult<()> {
    if !(0.0..=1.0).contains(&confidence_score) {
        return Err(AppError::BadRequest(
            "confidence_score must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}

/// List vision records, newest first
#[utoipa::path(
    get,
    path = "/api/computer-vision",
    params(VisionQuery),
    responses(
        (status = 200, description = "Vision records retrieved successfully", body = Vec<VisionDataResponse>),
    ),
    tag = "computer-vision"
)]
pub async fn list_vision_data(
    State(state): State<AppState>,
    Query(query): Query<VisionQuery>,
) -> AppResult<Json<Vec<VisionDataResponse>>> {
    let mut db_query = computer_vision_data::Entity::find();

    if let Some(batch_id) = query.batch_id {
        db_query = db_query.filter(computer_vision_data::Column::BatchId.eq(batch_id));
    }

    let records = db_query
        .order_by_desc(computer_vision_data::Column::Timestamp)
        .all(&state.db)
        .await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Get a vision record by ID
#[utoipa::path(
    get,
    path = "/api/computer-vision/{record_id}",
    params(
        ("record_id" = Uuid, Path, description = "Vision record UUID"),
    ),
    responses(
        (status = 200, description = "Vision record retrieved successfully", body = VisionDataResponse),
        (status = 404, description = "Vision record not found"),
    ),
    tag = "computer-vision"
)]
pub async fn get_vision_data(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<VisionDataResponse>> {
    let record = computer_vision_data::Entity::find_by_id(record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vision record not found".to_string()))?;

    Ok(Json(record.into()))
}

/// Store a vision record
#[utoipa::path(
    post,
    path = "/api/computer-vision",
    request_body = CreateVisionData,
    responses(
        (status = 201, description = "Vision record created", body = VisionDataResponse),
        (status = 400, description = "Invalid confidence or unknown batch"),
    ),
    tag = "computer-vision"
)]
pub async fn create_vision_data(
    State(state): State<AppState>,
    Json(body): Json<CreateVisionData>,
) -> AppResult<(StatusCode, Json<VisionDataResponse>)> {
    validate_confidence(body.confidence_score)?;

    let record = computer_vision_data::ActiveModel {
        id: Set(Uuid::new_v4()),
        batch_id: Set(body.batch_id),
        detected_objects: Set(body.detected_objects),
        confidence_score: Set(body.confidence_score),
        is_defect: Set(body.is_defect),
        timestamp: Set(Utc::now().into()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Update a vision record; omitted fields are left unchanged
#[utoipa::path(
    put,
    path = "/api/computer-vision/{record_id}",
    params(
        ("record_id" = Uuid, Path, description = "Vision record UUID"),
    ),
    request_body = UpdateVisionData,
    responses(
        (status = 200, description = "Vision record updated", body = VisionDataResponse),
        (status = 400, description = "Invalid confidence"),
        (status = 404, description = "Vision record not found"),
    ),
    tag = "computer-vision"
)]
pub async fn update_vision_data(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<UpdateVisionData>,
) -> AppResult<Json<VisionDataResponse>> {
    let record = computer_vision_data::Entity::find_by_id(record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vision record not found".to_string()))?;

    let mut active = record.into_active_model();

    if let Some(detected_objects) = body.detected_objects {
        active.detected_objects = Set(detected_objects);
    }
    if let Some(confidence_score) = body.confidence_score {
        validate_confidence(confidence_score)?;
        active.confidence_score = Set(confidence_score);
    }
    if let Some(is_defect) = body.is_defect {
        active.is_defect = Set(is_defect);
    }

    let record = active.update(&state.db).await?;
    Ok(Json(record.into()))
}

/// Delete a vision record
#[utoipa::path(
    delete,
    path = "/api/computer-vision/{record_id}",
    params(
        ("record_id" = Uuid, Path, description = "Vision record UUID"),
    ),
    responses(
        (status = 204, description = "Vision record deleted"),
        (status = 404, description = "Vision record not found"),
    ),
    tag = "computer-vision"
)]
pub async fn delete_vision_data(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = computer_vision_data::Entity::delete_by_id(record_id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Vision record not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Start the camera feed for the running batch
#[utoipa::path(
    post,
    path = "/api/computer-vision/start_camera",
    responses(
        (status = 200, description = "Camera started", body = StatusResponse),
        (status = 400, description = "No running batch"),
    ),
    tag = "computer-vision"
)]
pub async fn start_camera(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    vision::start_camera(&state.db).await?;
    Ok(Json(StatusResponse::success_with("Camera started")))
}

/// Stop the camera feed
#[utoipa::path(
    post,
    path = "/api/computer-vision/stop_camera",
    responses(
        (status = 200, description = "Camera stopped", body = StatusResponse),
    ),
    tag = "computer-vision"
)]
pub async fn stop_camera() -> Json<StatusResponse> {
    vision::stop_camera();
    Json(StatusResponse::success_with("Camera stopped"))
}

/// Run detection on the current frame of the running batch
#[utoipa::path(
    post,
    path = "/api/computer-vision/process_frame",
    responses(
        (status = 200, description = "Detection stored", body = VisionDataResponse),
        (status = 400, description = "No running batch"),
    ),
    tag = "computer-vision"
)]
pub async fn process_frame(State(state): State<AppState>) -> AppResult<Json<VisionDataResponse>> {
    let record = vision::process_frame(&state.db, state.source.as_ref()).await?;
    Ok(Json(record.into()))
}
