use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::notifications::NotificationType;
use crate::entity::production_settings;
use crate::error::{AppError, AppResult};
use crate::services::{notifications, production};
use crate::simulation::{DEFAULT_VALUES, ProcessValues};

/// The currently active settings row, if any.
pub async fn active_settings<C: ConnectionTrait>(
    conn: &C,
) -> AppResult<Option<production_settings::Model>> {
    let settings = production_settings::Entity::find()
        .filter(production_settings::Column::IsActive.eq(true))
        .order_by_desc(production_settings::Column::Timestamp)
        .one(conn)
        .await?;

    Ok(settings)
}

/// Values a fresh batch starts from: the active settings, or the defaults.
pub async fn seed_values<C: ConnectionTrait>(conn: &C) -> AppResult<ProcessValues> {
    Ok(active_settings(conn)
        .await?
        .map_or(DEFAULT_VALUES, |s| s.values()))
}

/// Clear the active flag on every settings row except `keep`.
pub async fn deactivate_others<C: ConnectionTrait>(conn: &C, keep: Option<Uuid>) -> AppResult<()> {
    let mut update = production_settings::Entity::update_many()
        .col_expr(production_settings::Column::IsActive, Expr::value(false))
        .filter(production_settings::Column::IsActive.eq(true));

    if let Some(id) = keep {
        update = update.filter(production_settings::Column::Id.ne(id));
    }

    update.exec(conn).await?;
    Ok(())
}

/// Make `settings_id` the only active settings row.
///
/// When a batch is running, a reading carrying the new values is recorded
/// straight away (no jitter, not evaluated for defects) together with an info
/// notification.
///
/// # Errors
///
/// `NotFound` for an unknown id; a unique violation if a concurrent
/// activation committed first.
pub async fn activate(
    db: &DatabaseConnection,
    settings_id: Uuid,
) -> AppResult<production_settings::Model> {
    let txn = db.begin().await?;

    let settings = production_settings::Entity::find_by_id(settings_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Production settings not found".to_string()))?;

    deactivate_others(&txn, Some(settings.id)).await?;

    let mut active = settings.into_active_model();
    active.is_active = Set(true);
    active.timestamp = Set(Utc::now().into());
    let settings = active.update(&txn).await?;

    if let Some(batch) = production::active_batch(&txn).await? {
        production::insert_parameter(&txn, batch.id, settings.values(), false).await?;
        notifications::notify(
            &txn,
            Some(batch.id),
            NotificationType::Info,
            format!("Production settings changed to {}", settings.name),
        )
        .await?;

        tracing::info!(
            settings = %settings.name,
            batch_number = %batch.batch_number,
            "Settings applied to running batch"
        );
    }

    txn.commit().await?;

    tracing::info!(settings_id = %settings.id, name = %settings.name, "Production settings activated");
    Ok(settings)
}
