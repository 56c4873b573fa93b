use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::entity::notifications::{self, NotificationType};
use crate::error::AppResult;

/// Record a notification, optionally attached to a batch.
pub async fn notify<C: ConnectionTrait>(
    conn: &C,
    batch_id: Option<Uuid>,
    notification_type: NotificationType,
    message: impl Into<String>,
) -> AppResult<notifications::Model> {
    let notification = notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        batch_id: Set(batch_id),
        message: Set(message.into()),
        notification_type: Set(notification_type),
        timestamp: Set(Utc::now().into()),
        is_read: Set(false),
    }
    .insert(conn)
    .await?;

    Ok(notification)
}

/// Flag every unread notification as read. Returns the number of rows updated.
pub async fn mark_all_read<C: ConnectionTrait>(conn: &C) -> AppResult<u64> {
    let result = notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, Expr::value(true))
        .filter(notifications::Column::IsRead.eq(false))
        .exec(conn)
        .await?;

    tracing::debug!(updated = result.rows_affected, "Notifications marked as read");
    Ok(result.rows_affected)
}
