use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::computer_vision_data;

#[derive(Debug, Serialize, ToSchema)]
pub struct VisionDataResponse {
    pub id: Uuid,
    pub batch_id: Uuid,
    /// Detection payload: object labels and bounding boxes
    #[schema(value_type = Object)]
    pub detected_objects: serde_json::Value,
    pub confidence_score: f64,
    pub is_defect: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<computer_vision_data::Model> for VisionDataResponse {
    fn from(v: computer_vision_data::Model) -> Self {
        Self {
            id: v.id,
            batch_id: v.batch_id,
            detected_objects: v.detected_objects,
            confidence_score: v.confidence_score,
            is_defect: v.is_defect,
            timestamp: v.timestamp.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VisionQuery {
    /// Filter by batch
    pub batch_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVisionData {
    pub batch_id: Uuid,
    #[schema(value_type = Object)]
    pub detected_objects: serde_json::Value,
    pub confidence_score: f64,
    #[serde(default)]
    pub is_defect: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVisionData {
    #[schema(value_type = Option<Object>)]
    pub detected_objects: Option<serde_json::Value>,
    pub confidence_score: Option<f64>,
    pub is_defect: Option<bool>,
}
