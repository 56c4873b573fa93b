use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub batch_number: String,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
    pub defect_count: i32,
    pub total_count: i32,
}

impl Model {
    /// Share of defective readings, in percent rounded to two decimals.
    #[must_use]
    pub fn defect_percentage(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        let ratio = f64::from(self.defect_count) / f64::from(self.total_count);
        (ratio * 100.0 * 100.0).round() / 100.0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::batch_parameters::Entity")]
    BatchParameters,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
    #[sea_orm(has_many = "super::computer_vision_data::Entity")]
    ComputerVisionData,
}

impl Related<super::batch_parameters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatchParameters.def()
    }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl Related<super::computer_vision_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComputerVisionData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
