// src/models/user.rs
// DOCUMENTATION: User, session and auth DTOs
// PURPOSE: Models for /users and /auth endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Authenticated session: bearer token plus the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Body of POST /auth/login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body of POST /auth/register
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Body of PUT /users/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// Only honored by the backend for admins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_user() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "username": "ana", "email": "ana@example.com"}"#)
                .unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_admin());

        let admin: User = serde_json::from_str(
            r#"{"id": 2, "username": "root", "email": "root@example.com", "role": "admin"}"#,
        )
        .unwrap();
        assert!(admin.is_admin());
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterRequest {
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = RegisterRequest {
            password: "short".to_string(),
            ..req
        };
        assert!(req.validate().is_err());

        let login = LoginRequest {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        assert!(login.validate().is_err());
    }
}
