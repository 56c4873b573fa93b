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
use crate::entity::notifications::{self, NotificationType};
use crate::error::{AppError, AppResult};
use crate::services;

use super::types::{CreateNotification, NotificationResponse, NotificationsQuery, UpdateNotification};

/// List notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationsQuery),
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = Vec<NotificationResponse>),
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let mut db_query = notifications::Entity::find();

    if let Some(batch_id) = query.batch_id {
        db_query = db_query.filter(notifications::Column::BatchId.eq(batch_id));
    }

    if let Some(is_read) = query.is_read {
        db_query = db_query.filter(notifications::Column::IsRead.eq(is_read));
    }

    if let Some(notification_type) = query.notification_type {
        db_query = db_query.filter(notifications::Column::NotificationType.eq(notification_type));
    }

    let notifications_list = db_query
        .order_by_desc(notifications::Column::Timestamp)
        .all(&state.db)
        .await?;

    Ok(Json(notifications_list.into_iter().map(Into::into).collect()))
}

/// Get a notification by ID
#[utoipa::path(
    get,
    path = "/api/notifications/{notification_id}",
    params(
        ("notification_id" = Uuid, Path, description = "Notification UUID"),
    ),
    responses(
        (status = 200, description = "Notification retrieved successfully", body = NotificationResponse),
        (status = 404, description = "Notification not found"),
    ),
    tag = "notifications"
)]
pub async fn get_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<NotificationResponse>> {
    let notification = notifications::Entity::find_by_id(notification_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification.into()))
}

/// Create a notification
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotification,
    responses(
        (status = 201, description = "Notification created", body = NotificationResponse),
        (status = 400, description = "Empty message or unknown batch"),
    ),
    tag = "notifications"
)]
pub async fn create_notification(
    State(state): State<AppState>,
    Json(body): Json<CreateNotification>,
) -> AppResult<(StatusCode, Json<NotificationResponse>)> {
    if body.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }

    let notification = notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        batch_id: Set(body.batch_id),
        message: Set(body.message),
        notification_type: Set(body.notification_type.unwrap_or(NotificationType::Info)),
        timestamp: Set(Utc::now().into()),
        is_read: Set(body.is_read),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(notification.into())))
}

/// Update a notification; omitted fields are left unchanged
#[utoipa::path(
    put,
    path = "/api/notifications/{notification_id}",
    params(
        ("notification_id" = Uuid, Path, description = "Notification UUID"),
    ),
    request_body = UpdateNotification,
    responses(
        (status = 200, description = "Notification updated", body = NotificationResponse),
        (status = 404, description = "Notification not found"),
    ),
    tag = "notifications"
)]
pub async fn update_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
    Json(body): Json<UpdateNotification>,
) -> AppResult<Json<NotificationResponse>> {
    let notification = notifications::Entity::find_by_id(notification_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    let mut active = notification.into_active_model();

    if let Some(message) = body.message {
        if message.trim().is_empty() {
            return Err(AppError::BadRequest("message must not be empty".to_string()));
        }
        active.message = Set(message);
    }
    if let Some(notification_type) = body.notification_type {
        active.notification_type = Set(notification_type);
    }
    if let Some(is_read) = body.is_read {
        active.is_read = Set(is_read);
    }

    let notification = active.update(&state.db).await?;
    Ok(Json(notification.into()))
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/api/notifications/{notification_id}",
    params(
        ("notification_id" = Uuid, Path, description = "Notification UUID"),
    ),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 404, description = "Notification not found"),
    ),
    tag = "notifications"
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = notifications::Entity::delete_by_id(notification_id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Mark every unread notification as read
#[utoipa::path(
    post,
    path = "/api/notifications/mark_all_read",
    responses(
        (status = 200, description = "All notifications marked as read", body = StatusResponse),
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    services::notifications::mark_all_read(&state.db).await?;
    Ok(Json(StatusResponse::success()))
}
