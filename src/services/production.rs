use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::notifications::NotificationType;
use crate::entity::{batch_parameters, batches};
use crate::error::{AppError, AppResult};
use crate::services::{notifications, settings};
use crate::simulation::{ProcessValues, SimulationSource};

/// The batch currently in production, if any.
pub async fn active_batch<C: ConnectionTrait>(conn: &C) -> AppResult<Option<batches::Model>> {
    let batch = batches::Entity::find()
        .filter(batches::Column::IsActive.eq(true))
        .order_by_desc(batches::Column::StartTime)
        .one(conn)
        .await?;

    Ok(batch)
}

/// Most recent reading recorded for a batch.
pub async fn latest_parameter<C: ConnectionTrait>(
    conn: &C,
    batch_id: Uuid,
) -> AppResult<Option<batch_parameters::Model>> {
    let parameter = batch_parameters::Entity::find()
        .filter(batch_parameters::Column::BatchId.eq(batch_id))
        .order_by_desc(batch_parameters::Column::Timestamp)
        .one(conn)
        .await?;

    Ok(parameter)
}

pub async fn insert_parameter<C: ConnectionTrait>(
    conn: &C,
    batch_id: Uuid,
    values: ProcessValues,
    is_defect: bool,
) -> AppResult<batch_parameters::Model> {
    let parameter = batch_parameters::ActiveModel {
        id: Set(Uuid::new_v4()),
        batch_id: Set(batch_id),
        temperature: Set(values.temperature),
        pressure: Set(values.pressure),
        mixing_speed: Set(values.mixing_speed),
        glazing_thickness: Set(values.glazing_thickness),
        timestamp: Set(Utc::now().into()),
        is_defect: Set(is_defect),
    }
    .insert(conn)
    .await?;

    Ok(parameter)
}

/// `B` followed by the UTC timestamp at second granularity.
#[must_use]
pub fn batch_number_for(now: DateTime<Utc>) -> String {
    format!("B{}", now.format("%Y%m%d%H%M%S"))
}

/// Batch number for `now`, suffixed with `-2`, `-3`, ... when the plain
/// timestamp is already taken by a batch started within the same second.
pub async fn unique_batch_number<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> AppResult<String> {
    let base = batch_number_for(now);
    let mut candidate = base.clone();
    let mut suffix = 1;

    while batches::Entity::find()
        .filter(batches::Column::BatchNumber.eq(&candidate))
        .count(conn)
        .await?
        > 0
    {
        suffix += 1;
        candidate = format!("{base}-{suffix}");
    }

    Ok(candidate)
}

/// Close any running batch and open a new one.
///
/// The new batch is seeded with one reading taken from the active settings,
/// or the defaults when no settings row is active. The seed is not counted
/// towards the batch totals.
///
/// # Errors
///
/// Database failures, including a unique violation when a concurrent start
/// committed first.
pub async fn start_production(db: &DatabaseConnection) -> AppResult<batches::Model> {
    let txn = db.begin().await?;
    let now = Utc::now();

    let running = batches::Entity::find()
        .filter(batches::Column::IsActive.eq(true))
        .all(&txn)
        .await?;

    for batch in running {
        let batch_number = batch.batch_number.clone();
        let mut active = batch.into_active_model();
        active.is_active = Set(false);
        active.end_time = Set(Some(now.into()));
        let closed = active.update(&txn).await?;

        notifications::notify(
            &txn,
            Some(closed.id),
            NotificationType::Info,
            format!("Batch {batch_number} completed"),
        )
        .await?;

        tracing::info!(batch_number = %batch_number, "Running batch closed by new start");
    }

    let batch = batches::ActiveModel {
        id: Set(Uuid::new_v4()),
        batch_number: Set(unique_batch_number(&txn, now).await?),
        start_time: Set(now.into()),
        end_time: Set(None),
        is_active: Set(true),
        defect_count: Set(0),
        total_count: Set(0),
    }
    .insert(&txn)
    .await?;

    notifications::notify(
        &txn,
        Some(batch.id),
        NotificationType::Success,
        format!("Batch {} started", batch.batch_number),
    )
    .await?;

    let seed = settings::seed_values(&txn).await?;
    insert_parameter(&txn, batch.id, seed, false).await?;

    txn.commit().await?;

    tracing::info!(batch_id = %batch.id, batch_number = %batch.batch_number, "Production started");
    Ok(batch)
}

/// Close a running batch.
///
/// # Errors
///
/// `NotFound` for an unknown batch, `Conflict` if it is already stopped.
pub async fn stop_production(db: &DatabaseConnection, batch_id: Uuid) -> AppResult<batches::Model> {
    let txn = db.begin().await?;

    let batch = batches::Entity::find_by_id(batch_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch not found".to_string()))?;

    if !batch.is_active {
        return Err(AppError::Conflict(format!(
            "Batch {} is already stopped",
            batch.batch_number
        )));
    }

    let mut active = batch.into_active_model();
    active.is_active = Set(false);
    active.end_time = Set(Some(Utc::now().into()));
    let batch = active.update(&txn).await?;

    notifications::notify(
        &txn,
        Some(batch.id),
        NotificationType::Info,
        format!("Batch {} stopped", batch.batch_number),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(batch_id = %batch.id, batch_number = %batch.batch_number, "Production stopped");
    Ok(batch)
}

/// Record the next simulated reading for a running batch.
///
/// The reading drifts from the latest one; a batch without readings starts
/// from the active settings or the defaults. Every simulated reading counts
/// towards `total_count`, defective ones also towards `defect_count` and raise
/// a warning notification.
///
/// # Errors
///
/// `NotFound` for an unknown batch, `Conflict` if it is not running.
pub async fn simulate_parameter(
    db: &DatabaseConnection,
    source: &dyn SimulationSource,
    batch_id: Uuid,
) -> AppResult<batch_parameters::Model> {
    let txn = db.begin().await?;

    let batch = batches::Entity::find_by_id(batch_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch not found".to_string()))?;

    if !batch.is_active {
        return Err(AppError::Conflict(format!(
            "Cannot simulate parameters for inactive batch {}",
            batch.batch_number
        )));
    }

    let values = match latest_parameter(&txn, batch.id).await? {
        Some(previous) => previous.values().drift(source),
        None => settings::seed_values(&txn).await?,
    };
    let is_defect = values.is_defective();

    let parameter = insert_parameter(&txn, batch.id, values, is_defect).await?;

    // Counters are bumped in SQL so concurrent simulations never lose an increment
    let updated = batches::Entity::update_many()
        .col_expr(
            batches::Column::TotalCount,
            Expr::col(batches::Column::TotalCount).add(1),
        )
        .col_expr(
            batches::Column::DefectCount,
            Expr::col(batches::Column::DefectCount).add(i32::from(is_defect)),
        )
        .filter(batches::Column::Id.eq(batch.id))
        .filter(batches::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(AppError::Conflict(format!(
            "Batch {} was stopped during simulation",
            batch.batch_number
        )));
    }

    if is_defect {
        notifications::notify(
            &txn,
            Some(batch.id),
            NotificationType::Warning,
            format!("Defect detected in batch {}", batch.batch_number),
        )
        .await?;

        tracing::warn!(
            batch_number = %batch.batch_number,
            temperature = values.temperature,
            pressure = values.pressure,
            mixing_speed = values.mixing_speed,
            glazing_thickness = values.glazing_thickness,
            "Defective reading"
        );
    }

    txn.commit().await?;

    tracing::debug!(batch_id = %batch.id, parameter_id = %parameter.id, is_defect, "Parameter simulated");
    Ok(parameter)
}
