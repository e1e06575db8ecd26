/*
 * Responsibility
 * - POST /auth/token: username/password → token
 * - POST /auth/register: 新規 (非 admin) user 作成 → token
 * - 失敗理由 (user 不在 / password 不一致) は区別せず 401
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::v1::dto::{
        auth::{RegisterRequest, TokenRequest, TokenResponse},
        json_body,
    },
    error::AppError,
    repos::user_repo::UserRow,
    services::auth::{
        Principal,
        password::{hash_password, verify_password, verify_password_for_unknown_user},
    },
    state::AppState,
};

pub async fn token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = json_body(payload)?;
    req.validate()
        .map_err(|e| AppError::bad_request("INVALID_BODY", e))?;

    let Some(user) = state.users.get(&req.username).await else {
        verify_password_for_unknown_user(&req.password);
        tracing::debug!(username = %req.username, "login for unknown user");
        return Err(AppError::Unauthorized);
    };

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "login with wrong password");
        return Err(AppError::Unauthorized);
    }

    let token = state.tokens.issue(&Principal::from(&user))?;
    Ok(Json(TokenResponse { token }))
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let req = json_body(payload)?;
    req.validate()
        .map_err(|e| AppError::bad_request("INVALID_BODY", e))?;

    let user = state
        .users
        .create(UserRow {
            username: req.username,
            password_hash: hash_password(&req.password)?,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            // Self-registration never grants admin.
            is_admin: false,
        })
        .await?;

    tracing::info!(username = %user.username, "user registered");

    let token = state.tokens.issue(&Principal::from(&user))?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
