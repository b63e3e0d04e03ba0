//! Active enums shared by several entities.
//!
//! Both enums are stored as their display strings so the same schema works on
//! Postgres and SQLite.

use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role, fixed at registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    /// Can create projects and manage their membership
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[default]
    #[sea_orm(string_value = "Developer")]
    Developer,
    #[sea_orm(string_value = "Viewer")]
    Viewer,
}

impl UserRole {
    /// Parse a role, falling back to [`UserRole::Developer`] for anything
    /// absent or unrecognised.
    pub fn from_optional(value: Option<&str>) -> Self { value.and_then(|v| v.parse().ok()).unwrap_or_default() }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Developer => "Developer",
            UserRole::Viewer => "Viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(UserRole::Admin),
            "Developer" => Ok(UserRole::Developer),
            "Viewer" => Ok(UserRole::Viewer),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Task workflow state. Any state may be set from any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    #[sea_orm(string_value = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    #[sea_orm(string_value = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "To Do" => Ok(TaskStatus::ToDo),
            "In Progress" => Ok(TaskStatus::InProgress),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Returned when parsing a string that names no variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "unknown value `{}`", self.0) }
}

impl std::error::Error for UnknownVariant {}
