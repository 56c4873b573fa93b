use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::batches;
use crate::routes::notifications::NotificationResponse;
use crate::routes::parameters::ParameterResponse;
use crate::routes::vision::VisionDataResponse;

/// Batch as shown in list views
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchSummary {
    pub id: Uuid,
    pub batch_number: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub defect_count: i32,
    pub total_count: i32,
    /// Percentage of defective readings, two decimals
    pub defect_percentage: f64,
}

impl From<batches::Model> for BatchSummary {
    fn from(b: batches::Model) -> Self {
        Self {
            defect_percentage: b.defect_percentage(),
            id: b.id,
            batch_number: b.batch_number,
            start_time: b.start_time.with_timezone(&Utc),
            end_time: b.end_time.map(|t| t.with_timezone(&Utc)),
            is_active: b.is_active,
            defect_count: b.defect_count,
            total_count: b.total_count,
        }
    }
}

/// Batch with its readings, notifications and vision records, newest first
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchDetailResponse {
    #[serde(flatten)]
    pub batch: BatchSummary,
    pub parameters: Vec<ParameterResponse>,
    pub notifications: Vec<NotificationResponse>,
    pub vision_data: Vec<VisionDataResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BatchesQuery {
    /// Filter by active flag
    pub is_active: Option<bool>,
}

/// Administrative batch creation. Production normally starts through
/// `start_production`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBatch {
    /// Generated from the current time when omitted
    pub batch_number: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Defaults to false; only one batch may be active
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub defect_count: i32,
    #[serde(default)]
    pub total_count: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBatch {
    pub batch_number: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub defect_count: Option<i32>,
    pub total_count: Option<i32>,
}
