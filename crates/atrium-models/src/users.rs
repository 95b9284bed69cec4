use std::fmt;
use std::str::FromStr;

use atrium_core::serde::{deserialize_optional_i64, deserialize_optional_string};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Parsed case-insensitively from JSON and from path or query strings alike;
/// `student` is accepted for `client`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Instructor,
    Client,
}

impl UserRole {
    /// Order in which roles are tried when a login omits the role.
    pub const LOGIN_ORDER: [UserRole; 3] = [UserRole::Admin, UserRole::Instructor, UserRole::Client];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Instructor => "instructor",
            UserRole::Client => "client",
        }
    }

    /// Roles that can be enumerated by an admin.
    pub fn is_listable(&self) -> bool {
        !matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "instructor" => Ok(UserRole::Instructor),
            "client" | "student" => Ok(UserRole::Client),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Partition key of the user table: `tenant_id#role`.
pub fn user_partition(tenant_id: &str, role: UserRole) -> String {
    format!("{}#{}", tenant_id, role.as_str())
}

/// Stored user item, including the password digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub tenant_id: String,
    pub dni: String,
    pub full_name: String,
    pub role: UserRole,
    pub password_digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// User as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub tenant_id: String,
    pub dni: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub detail: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            tenant_id: record.tenant_id,
            dni: record.dni,
            full_name: record.full_name,
            role: record.role,
            detail: record.detail,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    #[validate(length(min = 1, message = "dni is required"))]
    pub dni: String,
    #[validate(length(min = 1, message = "full_name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub role: UserRole,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub detail: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    pub message: String,
    pub tenant_id: String,
    pub dni: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct GetUserQuery {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub role: UserRole,
    #[validate(length(min = 1, message = "dni is required"))]
    pub dni: String,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct ListUsersQuery {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub role: UserRole,
    /// Page size (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Exclusive cursor: the last `dni` of the previous page
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_dni: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserList {
    pub users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_dni: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(UserRole::Client).unwrap(), json!("client"));
        let role: UserRole = serde_json::from_value(json!("student")).unwrap();
        assert_eq!(role, UserRole::Client);
        assert!(serde_json::from_value::<UserRole>(json!("manager")).is_err());
    }

    #[test]
    fn test_role_json_matches_from_str() {
        for raw in ["Admin", "INSTRUCTOR", " Student "] {
            let from_json: UserRole = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(Ok(from_json), raw.parse::<UserRole>());
        }
        assert!(serde_json::from_value::<UserRole>(json!(7)).is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(" instructor ".parse::<UserRole>(), Ok(UserRole::Instructor));
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_partition() {
        assert_eq!(user_partition("acme", UserRole::Instructor), "acme#instructor");
    }

    #[test]
    fn test_public_user_drops_digest() {
        let record = UserRecord {
            tenant_id: "acme".into(),
            dni: "100".into(),
            full_name: "Ada Lovelace".into(),
            role: UserRole::Admin,
            password_digest: "secret-digest".into(),
            detail: None,
            created_at: Utc::now(),
        };
        let user = serde_json::to_value(User::from(record)).unwrap();
        assert!(user.get("password_digest").is_none());
        assert_eq!(user["role"], "admin");
    }

    #[test]
    fn test_list_query_from_strings() {
        let query: ListUsersQuery = serde_json::from_value(json!({
            "tenant_id": "acme",
            "role": "client",
            "limit": "2",
            "last_dni": ""
        }))
        .unwrap();
        assert_eq!(query.limit, Some(2));
        assert_eq!(query.last_dni, None);
    }
}
