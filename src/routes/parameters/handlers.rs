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

use crate::common::AppState;
use crate::entity::batch_parameters;
use crate::error::{AppError, AppResult};
use crate::services::production;
use crate::simulation::ProcessValues;

use super::types::{CreateParameter, ParameterResponse, ParametersQuery, UpdateParameter};

/// List readings, newest first
#[utoipa::path(
    get,
    path = "/api/parameters",
    params(ParametersQuery),
    responses(
        (status = 200, description = "Readings retrieved successfully", body = Vec<ParameterResponse>),
    ),
    tag = "parameters"
)]
pub async fn list_parameters(
    State(state): State<AppState>,
    Query(query): Query<ParametersQuery>,
) -> AppResult<Json<Vec<ParameterResponse>>> {
    let mut db_query = batch_parameters::Entity::find();

    if let Some(batch_id) = query.batch_id {
        db_query = db_query.filter(batch_parameters::Column::BatchId.eq(batch_id));
    }

    if let Some(is_defect) = query.is_defect {
        db_query = db_query.filter(batch_parameters::Column::IsDefect.eq(is_defect));
    }

    let parameters = db_query
        .order_by_desc(batch_parameters::Column::Timestamp)
        .all(&state.db)
        .await?;

    Ok(Json(parameters.into_iter().map(Into::into).collect()))
}

/// Latest reading of the running batch
#[utoipa::path(
    get,
    path = "/api/parameters/current_parameters",
    responses(
        (status = 200, description = "Latest reading", body = ParameterResponse),
        (status = 404, description = "No running batch, or no readings yet"),
    ),
    tag = "parameters"
)]
pub async fn current_parameters(
    State(state): State<AppState>,
) -> AppResult<Json<ParameterResponse>> {
    let batch = production::active_batch(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No active batch".to_string()))?;

    let parameter = production::latest_parameter(&state.db, batch.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No parameters for the active batch".to_string()))?;

    Ok(Json(parameter.into()))
}

/// Get a reading by ID
#[utoipa::path(
    get,
    path = "/api/parameters/{parameter_id}",
    params(
        ("parameter_id" = Uuid, Path, description = "Reading UUID"),
    ),
    responses(
        (status = 200, description = "Reading retrieved successfully", body = ParameterResponse),
        (status = 404, description = "Reading not found"),
    ),
    tag = "parameters"
)]
pub async fn get_parameter(
    State(state): State<AppState>,
    Path(parameter_id): Path<Uuid>,
) -> AppResult<Json<ParameterResponse>> {
    let parameter = batch_parameters::Entity::find_by_id(parameter_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Parameter not found".to_string()))?;

    Ok(Json(parameter.into()))
}

/// Record a reading by hand. Batch counters are not affected.
#[utoipa::path(
    post,
    path = "/api/parameters",
    request_body = CreateParameter,
    responses(
        (status = 201, description = "Reading recorded", body = ParameterResponse),
        (status = 400, description = "Unknown batch"),
    ),
    tag = "parameters"
)]
pub async fn create_parameter(
    State(state): State<AppState>,
    Json(body): Json<CreateParameter>,
) -> AppResult<(StatusCode, Json<ParameterResponse>)> {
    let parameter = batch_parameters::ActiveModel {
        id: Set(Uuid::new_v4()),
        batch_id: Set(body.batch_id),
        temperature: Set(body.values.temperature),
        pressure: Set(body.values.pressure),
        mixing_speed: Set(body.values.mixing_speed),
        glazing_thickness: Set(body.values.glazing_thickness),
        timestamp: Set(body.timestamp.unwrap_or_else(Utc::now).into()),
        is_defect: Set(body.values.is_defective()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(parameter.into())))
}

/// Correct a reading; the defect flag is re-derived from the resulting values
#[utoipa::path(
    put,
    path = "/api/parameters/{parameter_id}",
    params(
        ("parameter_id" = Uuid, Path, description = "Reading UUID"),
    ),
    request_body = UpdateParameter,
    responses(
        (status = 200, description = "Reading updated", body = ParameterResponse),
        (status = 404, description = "Reading not found"),
    ),
    tag = "parameters"
)]
pub async fn update_parameter(
    State(state): State<AppState>,
    Path(parameter_id): Path<Uuid>,
    Json(body): Json<UpdateParameter>,
) -> AppResult<Json<ParameterResponse>> {
    let parameter = batch_parameters::Entity::find_by_id(parameter_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Parameter not found".to_string()))?;

    let current = parameter.values();
    let values = ProcessValues {
        temperature: body.temperature.unwrap_or(current.temperature),
        pressure: body.pressure.unwrap_or(current.pressure),
        mixing_speed: body.mixing_speed.unwrap_or(current.mixing_speed),
        glazing_thickness: body.glazing_thickness.unwrap_or(current.glazing_thickness),
    };

    let mut active = parameter.into_active_model();
    active.temperature = Set(values.temperature);
    active.pressure = Set(values.pressure);
    active.mixing_speed = Set(values.mixing_speed);
    active.glazing_thickness = Set(values.glazing_thickness);
    active.is_defect = Set(values.is_defective());
    if let Some(timestamp) = body.timestamp {
        active.timestamp = Set(timestamp.into());
    }

    let parameter = active.update(&state.db).await?;
    Ok(Json(parameter.into()))
}

/// Delete a reading
#[utoipa::path(
    delete,
    path = "/api/parameters/{parameter_id}",
    params(
        ("parameter_id" = Uuid, Path, description = "Reading UUID"),
    ),
    responses(
        (status = 204, description = "Reading deleted"),
        (status = 404, description = "Reading not found"),
    ),
    tag = "parameters"
)]
pub async fn delete_parameter(
    State(state): State<AppState>,
    Path(parameter_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = batch_parameters::Entity::delete_by_id(parameter_id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Parameter not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
