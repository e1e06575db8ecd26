/*
 * Responsibility
 * - /auth 系の request/response DTO
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::check_len;
use crate::services::auth::password::MIN_PASSWORD_LENGTH;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

impl TokenRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_len("username", &self.username, 1, 25)?;
        check_len("password", &self.password, 1, 64)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_profile(
            &self.username,
            &self.password,
            &self.first_name,
            &self.last_name,
            &self.email,
        )
    }
}

/// Shared by self-registration and admin user creation.
pub(crate) fn validate_profile(
    username: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Result<(), String> {
    check_len("username", username, 1, 25)?;
    if username.trim() != username {
        return Err("username must not have surrounding whitespace".to_string());
    }
    check_len("password", password, MIN_PASSWORD_LENGTH, 64)?;
    check_len("firstName", first_name, 1, 30)?;
    check_len("lastName", last_name, 1, 30)?;
    validate_email(email)
}

pub(crate) fn validate_email(email: &str) -> Result<(), String> {
    check_len("email", email, 6, 60)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("email must be a valid email address".to_string()),
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
