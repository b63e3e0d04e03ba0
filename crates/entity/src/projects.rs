//! Projects Entity
//!
//! A project groups tasks, chat messages and files. Its creator is always
//! allowed in, whether or not they appear in `project_members`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:          Uuid,
    pub title:       String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Never changes after creation
    pub created_by:  Uuid,
    pub deadline:    Option<DateTimeUtc>,
    pub created_at:  DateTimeUtc,
    pub updated_at:  DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_members::Entity")]
    ProjectMembers,
}

impl Related<super::project_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::ProjectMembers.def() }
}

impl ActiveModelBehavior for ActiveModel {}
