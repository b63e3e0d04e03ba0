//! # Data Transfer Objects
//!
//! Request and response bodies for the API. Field names are camelCase and
//! record ids are serialized as `_id`, which is what the web client expects.

pub mod auth;
pub mod files;
pub mod messages;
pub mod projects;
pub mod tasks;
pub mod users;

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use entity::{sea_orm_active_enums::UserRole, users as user_entity};
use error::{AppError, Result};
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

/// A user embedded in another record.
///
/// `role` is only present where the client shows it (project members and
/// file uploaders).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id:    Uuid,
    pub name:  String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role:  Option<UserRole>,
}

impl UserRef {
    /// Name and email only.
    pub fn contact(user: &user_entity::Model) -> Self {
        Self {
            id:    user.id,
            name:  user.name.clone(),
            email: user.email.clone(),
            role:  None,
        }
    }

    /// Name, email and role.
    pub fn with_role(user: &user_entity::Model) -> Self {
        Self {
            role: Some(user.role),
            ..Self::contact(user)
        }
    }
}

/// Deserialize an optional value from a string, treating `null`, a missing
/// field and blank strings alike.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Trimmed, non-empty text or `None`.
pub fn non_blank(value: Option<&str>) -> Option<&str> { value.map(str::trim).filter(|s| !s.is_empty()) }

/// Parse a deadline given either as an RFC 3339 timestamp or a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_deadline(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| AppError::bad_request(format!("Invalid deadline: {}", value)))
}

/// Parse an optional deadline, ignoring blanks.
pub fn parse_optional_deadline(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    non_blank(value).map(parse_deadline).transpose()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "blank_as_none")]
        id: Option<Uuid>,
    }

    #[test]
    fn test_blank_as_none() {
        let probe: Probe = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert_eq!(probe.id, None);

        let probe: Probe = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(probe.id, None);

        let probe: Probe = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert_eq!(probe.id, None);

        let id = Uuid::new_v4();
        let probe: Probe = serde_json::from_str(&format!(r#"{{"id": "{}"}}"#, id)).unwrap();
        assert_eq!(probe.id, Some(id));

        assert!(serde_json::from_str::<Probe>(r#"{"id": "not-a-uuid"}"#).is_err());
    }

    #[test]
    fn test_parse_deadline_date_only() {
        let deadline = parse_deadline("2026-03-15").unwrap();
        assert_eq!((deadline.year(), deadline.month(), deadline.day()), (2026, 3, 15));
        assert_eq!(deadline.hour(), 0);
    }

    #[test]
    fn test_parse_deadline_rfc3339() {
        let deadline = parse_deadline("2026-03-15T10:30:00+02:00").unwrap();
        assert_eq!(deadline.hour(), 8);
    }

    #[test]
    fn test_parse_deadline_rejects_garbage() {
        let err = parse_deadline("next tuesday").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_optional_deadline_blank() {
        assert_eq!(parse_optional_deadline(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_deadline(None).unwrap(), None);
    }

    #[test]
    fn test_user_ref_role_is_optional() {
        let now = Utc::now();
        let user = user_entity::Model {
            id:            Uuid::new_v4(),
            name:          "Grace".to_string(),
            email:         "grace@example.com".to_string(),
            password_hash: String::new(),
            role:          UserRole::Viewer,
            created_at:    now,
            updated_at:    now,
        };

        let contact = serde_json::to_value(UserRef::contact(&user)).unwrap();
        assert!(contact.get("role").is_none());

        let with_role = serde_json::to_value(UserRef::with_role(&user)).unwrap();
        assert_eq!(with_role["role"], "Viewer");
        assert_eq!(with_role["_id"], user.id.to_string());
    }
}
