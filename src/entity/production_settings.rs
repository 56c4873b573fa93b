use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::ProcessValues;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub temperature: f64,
    pub pressure: f64,
    pub mixing_speed: f64,
    pub glazing_thickness: f64,
    pub is_active: bool,
    /// Refreshed on every write
    pub timestamp: DateTimeWithTimeZone,
}

impl Model {
    #[must_use]
    pub fn values(&self) -> ProcessValues {
        ProcessValues {
            temperature: self.temperature,
            pressure: self.pressure,
            mixing_speed: self.mixing_speed,
            glazing_thickness: self.glazing_thickness,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
