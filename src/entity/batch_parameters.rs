use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::ProcessValues;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batch_parameters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub batch_id: Uuid,
    pub temperature: f64,
    pub pressure: f64,
    pub mixing_speed: f64,
    pub glazing_thickness: f64,
    pub timestamp: DateTimeWithTimeZone,
    pub is_defect: bool,
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
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batches::Entity",
        from = "Column::BatchId",
        to = "super::batches::Column::Id",
        on_delete = "Cascade"
    )]
    Batch,
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
