/*
 * Responsibility
 * - /users 系 CRUD handler
 * - 認可は routes 側の guard (admin / self-or-admin) で済んでいる前提
 * - POST /users (admin) は作成した user の token も返す
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    api::v1::{
        dto::{
            json_body,
            users::{CreateUserRequest, UpdateUserRequest, UserResponse},
        },
        extractors::CurrentUser,
    },
    error::AppError,
    repos::user_repo::{UserChanges, UserRow},
    services::auth::{Principal, password::hash_password},
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
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
            is_admin: req.is_admin,
        })
        .await?;

    tracing::info!(
        actor = %actor.username(),
        username = %user.username,
        is_admin = user.is_admin,
        "user created"
    );

    let token = state.tokens.issue(&Principal::from(&user))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": UserResponse::from(user), "token": token })),
    ))
}

pub async fn list_users(State(state): State<AppState>) -> Json<Value> {
    let users: Vec<UserResponse> = state
        .users
        .list()
        .await
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Json(json!({ "users": users }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .users
        .get(&username)
        .await
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(json!({ "user": UserResponse::from(user) })))
}

pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let req = json_body(payload)?;
    req.validate()
        .map_err(|e| AppError::bad_request("INVALID_BODY", e))?;

    let password_hash = match &req.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let changes = UserChanges {
        password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
    };

    let user = state
        .users
        .update(&username, changes)
        .await
        .ok_or(AppError::not_found("user"))?;

    tracing::info!(actor = %actor.username(), username = %user.username, "user updated");

    Ok(Json(json!({ "user": UserResponse::from(user) })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.users.delete(&username).await {
        return Err(AppError::not_found("user"));
    }

    tracing::info!(actor = %actor.username(), %username, "user deleted");

    Ok(Json(json!({ "deleted": username })))
}
