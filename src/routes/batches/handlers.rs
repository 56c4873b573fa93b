use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::{batch_parameters, batches, computer_vision_data, notifications};
use crate::error::{AppError, AppResult};
use crate::routes::parameters::ParameterResponse;
use crate::services::production;

use super::types::{BatchDetailResponse, BatchSummary, BatchesQuery, CreateBatch, UpdateBatch};

const MAX_BATCH_NUMBER_LEN: usize = 50;

/// Assemble the nested representation of a batch.
pub async fn load_batch_detail<C: ConnectionTrait>(
    conn: &C,
    batch: batches::Model,
) -> AppResult<BatchDetailResponse> {
    let parameters = batch_parameters::Entity::find()
        .filter(batch_parameters::Column::BatchId.eq(batch.id))
        .order_by_desc(batch_parameters::Column::Timestamp)
        .all(conn)
        .await?;

    let notifications_list = notifications::Entity::find()
        .filter(notifications::Column::BatchId.eq(batch.id))
        .order_by_desc(notifications::Column::Timestamp)
        .all(conn)
        .await?;

    let vision_data = computer_vision_data::Entity::find()
        .filter(computer_vision_data::Column::BatchId.eq(batch.id))
        .order_by_desc(computer_vision_data::Column::Timestamp)
        .all(conn)
        .await?;

    Ok(BatchDetailResponse {
        batch: batch.into(),
        parameters: parameters.into_iter().map(Into::into).collect(),
        notifications: notifications_list.into_iter().map(Into::into).collect(),
        vision_data: vision_data.into_iter().map(Into::into).collect(),
    })
}

async fn find_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> AppResult<batches::Model> {
    batches::Entity::find_by_id(batch_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch not found".to_string()))
}

fn validate_counts(defect_count: i32, total_count: i32) -> AppResult<()> {
    if defect_count < 0 || total_count < 0 {
        return Err(AppError::BadRequest(
            "Counters must not be negative".to_string(),
        ));
    }
    if defect_count > total_count {
        return Err(AppError::BadRequest(
            "defect_count must not exceed total_count".to_string(),
        ));
    }
    Ok(())
}

fn validate_batch_number(batch_number: &str) -> AppResult<()> {
    if batch_number.trim().is_empty() {
        return Err(AppError::BadRequest("batch_number must not be empty".to_string()));
    }
    if batch_number.len() > MAX_BATCH_NUMBER_LEN {
        return Err(AppError::BadRequest(format!(
            "batch_number must be at most {MAX_BATCH_NUMBER_LEN} characters"
        )));
    }
    Ok(())
}

/// List batches, newest first
#[utoipa::path(
    get,
    path = "/api/batches",
    params(BatchesQuery),
    responses(
        (status = 200, description = "Batches retrieved successfully", body = Vec<BatchSummary>),
    ),
    tag = "batches"
)]
pub async fn list_batches(
    State(state): State<AppState>,
    Query(query): Query<BatchesQuery>,
) -> AppResult<Json<Vec<BatchSummary>>> {
    let mut db_query = batches::Entity::find();

    if let Some(is_active) = query.is_active {
        db_query = db_query.filter(batches::Column::IsActive.eq(is_active));
    }

    let batches_list = db_query
        .order_by_desc(batches::Column::StartTime)
        .all(&state.db)
        .await?;

    Ok(Json(batches_list.into_iter().map(Into::into).collect()))
}

/// Get a batch with its readings, notifications and vision records
#[utoipa::path(
    get,
    path = "/api/batches/{batch_id}",
    params(
        ("batch_id" = Uuid, Path, description = "Batch UUID"),
    ),
    responses(
        (status = 200, description = "Batch retrieved successfully", body = BatchDetailResponse),
        (status = 404, description = "Batch not found"),
    ),
    tag = "batches"
)]
pub async fn get_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<BatchDetailResponse>> {
    let batch = find_batch(&state.db, batch_id).await?;
    Ok(Json(load_batch_detail(&state.db, batch).await?))
}

/// Create a batch record directly
#[utoipa::path(
    post,
    path = "/api/batches",
    request_body = CreateBatch,
    responses(
        (status = 201, description = "Batch created", body = BatchDetailResponse),
        (status = 400, description = "Invalid batch"),
        (status = 409, description = "Duplicate batch number or another batch is active"),
    ),
    tag = "batches"
)]
pub async fn create_batch(
    State(state): State<AppState>,
    Json(body): Json<CreateBatch>,
) -> AppResult<(StatusCode, Json<BatchDetailResponse>)> {
    validate_counts(body.defect_count, body.total_count)?;

    let now = Utc::now();
    let batch_number = match body.batch_number {
        Some(number) => {
            validate_batch_number(&number)?;
            number
        }
        None => production::unique_batch_number(&state.db, now).await?,
    };

    let batch = batches::ActiveModel {
        id: Set(Uuid::new_v4()),
        batch_number: Set(batch_number),
        start_time: Set(body.start_time.unwrap_or(now).into()),
        end_time: Set(body.end_time.map(Into::into)),
        is_active: Set(body.is_active),
        defect_count: Set(body.defect_count),
        total_count: Set(body.total_count),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(batch_id = %batch.id, batch_number = %batch.batch_number, "Batch created");
    let detail = load_batch_detail(&state.db, batch).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Update a batch record; omitted fields are left unchanged
#[utoipa::path(
    put,
    path = "/api/batches/{batch_id}",
    params(
        ("batch_id" = Uuid, Path, description = "Batch UUID"),
    ),
    request_body = UpdateBatch,
    responses(
        (status = 200, description = "Batch updated", body = BatchDetailResponse),
        (status = 400, description = "Invalid batch"),
        (status = 404, description = "Batch not found"),
        (status = 409, description = "Duplicate batch number or another batch is active"),
    ),
    tag = "batches"
)]
pub async fn update_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(body): Json<UpdateBatch>,
) -> AppResult<Json<BatchDetailResponse>> {
    let batch = find_batch(&state.db, batch_id).await?;

    validate_counts(
        body.defect_count.unwrap_or(batch.defect_count),
        body.total_count.unwrap_or(batch.total_count),
    )?;

    let was_active = batch.is_active;
    let mut active = batch.into_active_model();

    if let Some(number) = body.batch_number {
        validate_batch_number(&number)?;
        active.batch_number = Set(number);
    }
    if let Some(start_time) = body.start_time {
        active.start_time = Set(start_time.into());
    }
    if let Some(end_time) = body.end_time {
        active.end_time = Set(Some(end_time.into()));
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
        // Closing a batch through the admin path still records when it ended
        if was_active && !is_active && body.end_time.is_none() {
            active.end_time = Set(Some(Utc::now().into()));
        }
        // A reopened batch has not ended
        if !was_active && is_active && body.end_time.is_none() {
            active.end_time = Set(None);
        }
    }
    if let Some(defect_count) = body.defect_count {
        active.defect_count = Set(defect_count);
    }
    if let Some(total_count) = body.total_count {
        active.total_count = Set(total_count);
    }

    let batch = active.update(&state.db).await?;
    Ok(Json(load_batch_detail(&state.db, batch).await?))
}

/// Delete a batch together with its readings, notifications and vision records
#[utoipa::path(
    delete,
    path = "/api/batches/{batch_id}",
    params(
        ("batch_id" = Uuid, Path, description = "Batch UUID"),
    ),
    responses(
        (status = 204, description = "Batch deleted"),
        (status = 404, description = "Batch not found"),
    ),
    tag = "batches"
)]
pub async fn delete_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = batches::Entity::delete_by_id(batch_id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Batch not found".to_string()));
    }

    tracing::info!(%batch_id, "Batch deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Close any running batch and start a new one
#[utoipa::path(
    post,
    path = "/api/batches/start_production",
    responses(
        (status = 201, description = "Production started", body = BatchDetailResponse),
        (status = 409, description = "A concurrent start won the race"),
    ),
    tag = "production"
)]
pub async fn start_production(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<BatchDetailResponse>)> {
    let batch = production::start_production(&state.db).await?;
    let detail = load_batch_detail(&state.db, batch).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Stop a running batch
#[utoipa::path(
    post,
    path = "/api/batches/{batch_id}/stop_production",
    params(
        ("batch_id" = Uuid, Path, description = "Batch UUID"),
    ),
    responses(
        (status = 200, description = "Production stopped", body = BatchDetailResponse),
        (status = 404, description = "Batch not found"),
        (status = 409, description = "Batch is already stopped"),
    ),
    tag = "production"
)]
pub async fn stop_production(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<BatchDetailResponse>> {
    let batch = production::stop_production(&state.db, batch_id).await?;
    Ok(Json(load_batch_detail(&state.db, batch).await?))
}

/// Record the next simulated reading for a running batch
#[utoipa::path(
    post,
    path = "/api/batches/{batch_id}/simulate_parameter",
    params(
        ("batch_id" = Uuid, Path, description = "Batch UUID"),
    ),
    responses(
        (status = 200, description = "Reading recorded", body = ParameterResponse),
        (status = 404, description = "Batch not found"),
        (status = 409, description = "Batch is not running"),
    ),
    tag = "production"
)]
pub async fn simulate_parameter(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<ParameterResponse>> {
    let parameter =
        production::simulate_parameter(&state.db, state.source.as_ref(), batch_id).await?;
    Ok(Json(parameter.into()))
}
