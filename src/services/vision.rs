//! Placeholder for the camera-based defect detection feed.
//!
//! No frames are captured. `process_frame` stores a fabricated detection so
//! that the rest of the system can be exercised end to end.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde_json::json;
use uuid::Uuid;

use crate::entity::{batches, computer_vision_data};
use crate::error::{AppError, AppResult};
use crate::services::production;
use crate::simulation::SimulationSource;

const MIN_CONFIDENCE: f64 = 0.7;
const MAX_CONFIDENCE: f64 = 0.99;

async fn require_active_batch<C: ConnectionTrait>(
    conn: &C,
    action: &str,
) -> AppResult<batches::Model> {
    production::active_batch(conn)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("No active batch to {action}")))
}

/// # Errors
///
/// `BadRequest` when no batch is running.
pub async fn start_camera<C: ConnectionTrait>(conn: &C) -> AppResult<()> {
    let batch = require_active_batch(conn, "start the camera for").await?;
    tracing::info!(batch_number = %batch.batch_number, "Camera started");
    Ok(())
}

pub fn stop_camera() {
    tracing::info!("Camera stopped");
}

/// Fixed detection payload: one protein bar in one bounding box.
#[must_use]
pub fn fabricated_detection() -> serde_json::Value {
    json!({
        "objects": ["protein_bar"],
        "boxes": [[100, 100, 200, 200]],
    })
}

/// # Errors
///
/// `BadRequest` when no batch is running; nothing is stored in that case.
pub async fn process_frame<C: ConnectionTrait>(
    conn: &C,
    source: &dyn SimulationSource,
) -> AppResult<computer_vision_data::Model> {
    let batch = require_active_batch(conn, "process a frame for").await?;

    let confidence_score = source.uniform(MIN_CONFIDENCE, MAX_CONFIDENCE);
    let is_defect = source.coin_flip();

    let record = computer_vision_data::ActiveModel {
        id: Set(Uuid::new_v4()),
        batch_id: Set(batch.id),
        detected_objects: Set(fabricated_detection()),
        confidence_score: Set(confidence_score),
        is_defect: Set(is_defect),
        timestamp: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    tracing::debug!(
        batch_number = %batch.batch_number,
        confidence_score,
        is_defect,
        "Frame processed"
    );
    Ok(record)
}
