use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::batch_parameters;
use crate::simulation::ProcessValues;

#[derive(Debug, Serialize, ToSchema)]
pub struct ParameterResponse {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub temperature: f64,
    pub pressure: f64,
    pub mixing_speed: f64,
    pub glazing_thickness: f64,
    pub timestamp: DateTime<Utc>,
    pub is_defect: bool,
}

impl From<batch_parameters::Model> for ParameterResponse {
    fn from(p: batch_parameters::Model) -> Self {
        Self {
            id: p.id,
            batch_id: p.batch_id,
            temperature: p.temperature,
            pressure: p.pressure,
            mixing_speed: p.mixing_speed,
            glazing_thickness: p.glazing_thickness,
            timestamp: p.timestamp.with_timezone(&Utc),
            is_defect: p.is_defect,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametersQuery {
    /// Filter by batch
    pub batch_id: Option<Uuid>,
    /// Filter by defect flag
    pub is_defect: Option<bool>,
}

/// Manually recorded reading. The defect flag is derived from the values.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateParameter {
    pub batch_id: Uuid,
    #[serde(flatten)]
    pub values: ProcessValues,
    /// Defaults to now
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateParameter {
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub mixing_speed: Option<f64>,
    pub glazing_thickness: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}
