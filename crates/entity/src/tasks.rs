//! Tasks Entity
//!
//! `project_id` is a plain reference: tasks outlive a deleted project.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::sea_orm_active_enums::TaskStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:          Uuid,
    pub title:       String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status:      TaskStatus,
    pub assigned_to: Option<Uuid>,
    pub project_id:  Uuid,
    pub deadline:    Option<DateTimeUtc>,
    pub created_at:  DateTimeUtc,
    pub updated_at:  DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A task is overdue when its deadline has passed and it is not completed.
    pub fn is_overdue(&self, now: DateTimeUtc) -> bool {
        self.status != TaskStatus::Completed && self.deadline.is_some_and(|deadline| deadline < now)
    }
}
