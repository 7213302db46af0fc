//! Technology entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "technologies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::mentorship_technology::Entity")]
    MentorshipTechnologies,
}

impl Related<super::mentorship_technology::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MentorshipTechnologies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
