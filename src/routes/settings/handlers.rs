use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::production_settings;
use crate::error::{AppError, AppResult};
use crate::services::settings;

use super::types::{CreateSettings, SettingsResponse, UpdateSettings};

const MAX_NAME_LEN: usize = 50;

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// List production settings, most recently changed first
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Settings retrieved successfully", body = Vec<SettingsResponse>),
    ),
    tag = "settings"
)]
pub async fn list_settings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SettingsResponse>>> {
    let settings_list = production_settings::Entity::find()
        .order_by_desc(production_settings::Column::Timestamp)
        .all(&state.db)
        .await?;

    Ok(Json(settings_list.into_iter().map(Into::into).collect()))
}

/// Currently active production settings
#[utoipa::path(
    get,
    path = "/api/settings/active",
    responses(
        (status = 200, description = "Active settings", body = SettingsResponse),
        (status = 404, description = "No settings are active"),
    ),
    tag = "settings"
)]
pub async fn active_settings(State(state): State<AppState>) -> AppResult<Json<SettingsResponse>> {
    let active = settings::active_settings(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No active production settings".to_string()))?;

    Ok(Json(active.into()))
}

/// Get production settings by ID
#[utoipa::path(
    get,
    path = "/api/settings/{settings_id}",
    params(
        ("settings_id" = Uuid, Path, description = "Settings UUID"),
    ),
    responses(
        (status = 200, description = "Settings retrieved successfully", body = SettingsResponse),
        (status = 404, description = "Settings not found"),
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    Path(settings_id): Path<Uuid>,
) -> AppResult<Json<SettingsResponse>> {
    let found = production_settings::Entity::find_by_id(settings_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Production settings not found".to_string()))?;

    Ok(Json(found.into()))
}

/// Create production settings
#[utoipa::path(
    post,
    path = "/api/settings",
    request_body = CreateSettings,
    responses(
        (status = 201, description = "Settings created", body = SettingsResponse),
        (status = 400, description = "Invalid settings"),
        (status = 409, description = "Name already in use"),
    ),
    tag = "settings"
)]
pub async fn create_settings(
    State(state): State<AppState>,
    Json(body): Json<CreateSettings>,
) -> AppResult<(StatusCode, Json<SettingsResponse>)> {
    validate_name(&body.name)?;

    let txn = state.db.begin().await?;

    if body.is_active {
        settings::deactivate_others(&txn, None).await?;
    }

    let created = production_settings::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(body.name),
        temperature: Set(body.values.temperature),
        pressure: Set(body.values.pressure),
        mixing_speed: Set(body.values.mixing_speed),
        glazing_thickness: Set(body.values.glazing_thickness),
        is_active: Set(body.is_active),
        timestamp: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(settings_id = %created.id, name = %created.name, "Production settings created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update production settings; omitted fields are left unchanged
///
/// Unlike `activate`, turning a row active here does not inject a reading
/// into the running batch.
#[utoipa::path(
    put,
    path = "/api/settings/{settings_id}",
    params(
        ("settings_id" = Uuid, Path, description = "Settings UUID"),
    ),
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = SettingsResponse),
        (status = 400, description = "Invalid settings"),
        (status = 404, description = "Settings not found"),
        (status = 409, description = "Name already in use"),
    ),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Path(settings_id): Path<Uuid>,
    Json(body): Json<UpdateSettings>,
) -> AppResult<Json<SettingsResponse>> {
    let txn = state.db.begin().await?;

    let found = production_settings::Entity::find_by_id(settings_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Production settings not found".to_string()))?;

    let mut active = found.into_active_model();

    if let Some(name) = body.name {
        validate_name(&name)?;
        active.name = Set(name);
    }
    if let Some(temperature) = body.temperature {
        active.temperature = Set(temperature);
    }
    if let Some(pressure) = body.pressure {
        active.pressure = Set(pressure);
    }
    if let Some(mixing_speed) = body.mixing_speed {
        active.mixing_speed = Set(mixing_speed);
    }
    if let Some(glazing_thickness) = body.glazing_thickness {
        active.glazing_thickness = Set(glazing_thickness);
    }
    if let Some(is_active) = body.is_active {
        if is_active {
            settings::deactivate_others(&txn, Some(settings_id)).await?;
        }
        active.is_active = Set(is_active);
    }
    active.timestamp = Set(Utc::now().into());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(updated.into()))
}

/// Delete production settings
#[utoipa::path(
    delete,
    path = "/api/settings/{settings_id}",
    params(
        ("settings_id" = Uuid, Path, description = "Settings UUID"),
    ),
    responses(
        (status = 204, description = "Settings deleted"),
        (status = 404, description = "Settings not found"),
    ),
    tag = "settings"
)]
pub async fn delete_settings(
    State(state): State<AppState>,
    Path(settings_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = production_settings::Entity::delete_by_id(settings_id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Production settings not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Make these settings the only active ones
///
/// When a batch is running, a reading with the new values is recorded
/// immediately and an info notification is raised.
#[utoipa::path(
    post,
    path = "/api/settings/{settings_id}/activate",
    params(
        ("settings_id" = Uuid, Path, description = "Settings UUID"),
    ),
    responses(
        (status = 200, description = "Settings activated", body = SettingsResponse),
        (status = 404, description = "Settings not found"),
        (status = 409, description = "A concurrent activation won the race"),
    ),
    tag = "settings"
)]
pub async fn activate_settings(
    State(state): State<AppState>,
    Path(settings_id): Path<Uuid>,
) -> AppResult<Json<SettingsResponse>> {
    let activated = settings::activate(&state.db, settings_id).await?;
    Ok(Json(activated.into()))
}
