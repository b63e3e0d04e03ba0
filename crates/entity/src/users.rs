//! Users Entity
//!
//! Registered accounts. Emails are stored trimmed and lowercased, which makes
//! the unique index case-insensitive in practice.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::sea_orm_active_enums::UserRole;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:            Uuid,
    pub name:          String,
    #[sea_orm(unique)]
    pub email:         String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role:          UserRole,
    pub created_at:    DateTimeUtc,
    pub updated_at:    DateTimeUtc,
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

/// Normalize an email address the way it is stored.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }
