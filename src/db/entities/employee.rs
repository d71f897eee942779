use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// The externally visible identifier ("employeeID" on the wire).
    #[sea_orm(unique)]
    pub employee_code: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub dob: Date,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activity_record::Entity")]
    ActivityRecords,
}

impl Related<super::activity_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
