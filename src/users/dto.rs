use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Role, error::AppError, users::User};

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.\-]{3,20}$").unwrap();
}

pub(crate) fn validate_username(username: &str) -> Result<(), AppError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(AppError::ValidationFailed(
            "username must be 3-20 characters of letters, digits, '_', '.' or '-'".into(),
        ))
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if (6..=64).contains(&len) {
        Ok(())
    } else {
        Err(AppError::ValidationFailed(
            "password must be 6-64 characters".into(),
        ))
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for self-registration. A submitted `role` is accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.username = self.username.trim().to_string();
        validate_username(&self.username)?;
        validate_password(&self.password)
    }
}

/// Full replacement of a user record, managers only.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl UpdateUserRequest {
    pub fn validate(&mut self) -> Result<Role, AppError> {
        self.username = self.username.trim().to_string();
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        self.role
            .parse()
            .map_err(|_| AppError::ValidationFailed("role must be 'employee' or 'manager'".into()))
    }
}

/// User as returned to clients; the password never leaves the server.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_the.builder-2").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(21)).is_err());
    }

    #[test]
    fn register_request_trims_and_validates() {
        let mut req = RegisterRequest {
            username: "  carol ".into(),
            password: "secret".into(),
            role: Some("manager".into()),
        };
        req.validate().expect("valid request");
        assert_eq!(req.username, "carol");

        let mut short = RegisterRequest {
            username: "carol".into(),
            password: "12345".into(),
            role: None,
        };
        assert!(matches!(short.validate(), Err(AppError::ValidationFailed(_))));
    }

    #[test]
    fn update_request_rejects_unknown_role() {
        let mut req = UpdateUserRequest {
            username: "dave".into(),
            password: "secret".into(),
            role: "admin".into(),
        };
        assert!(req.validate().is_err());
        req.role = "Manager".into();
        assert_eq!(req.validate().unwrap(), Role::Manager);
    }

    #[test]
    fn public_user_never_serializes_password() {
        let json = serde_json::to_string(&PublicUser {
            id: Uuid::new_v4(),
            username: "alice".into(),
            role: Role::Employee,
        })
        .unwrap();
        assert!(json.contains("\"role\":\"employee\""));
        assert!(!json.contains("password"));
    }
}
