/*
 * Responsibility
 * - Users の request/response DTO
 * - validate() で形式チェック (username / isAdmin は PATCH では変更不可)
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::auth::{validate_email, validate_profile};
use crate::api::v1::dto::check_len;
use crate::repos::user_repo::UserRow;
use crate::services::auth::password::MIN_PASSWORD_LENGTH;

/// Admin-only creation; unlike registration it may grant admin.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl CreateUserRequest {
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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.password.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
        {
            return Err("at least one field is required".to_string());
        }
        if let Some(password) = &self.password {
            check_len("password", password, MIN_PASSWORD_LENGTH, 64)?;
        }
        if let Some(first_name) = &self.first_name {
            check_len("firstName", first_name, 1, 30)?;
        }
        if let Some(last_name) = &self.last_name {
            check_len("lastName", last_name, 1, 30)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            is_admin: row.is_admin,
        }
    }
}
