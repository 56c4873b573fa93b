use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::production_settings;
use crate::simulation::ProcessValues;

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub id: Uuid,
    pub name: String,
    pub temperature: f64,
    pub pressure: f64,
    pub mixing_speed: f64,
    pub glazing_thickness: f64,
    pub is_active: bool,
    /// Time of the last change
    pub timestamp: DateTime<Utc>,
}

impl From<production_settings::Model> for SettingsResponse {
    fn from(s: production_settings::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            temperature: s.temperature,
            pressure: s.pressure,
            mixing_speed: s.mixing_speed,
            glazing_thickness: s.glazing_thickness,
            is_active: s.is_active,
            timestamp: s.timestamp.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSettings {
    pub name: String,
    #[serde(flatten)]
    pub values: ProcessValues,
    /// Creating an active row deactivates every other row
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettings {
    pub name: Option<String>,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub mixing_speed: Option<f64>,
    pub glazing_thickness: Option<f64>,
    /// Setting this to true deactivates every other row
    pub is_active: Option<bool>,
}
